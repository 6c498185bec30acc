use rand::Rng;

/// Resolution of the synthesized preview waveform.
pub const SAMPLES_PER_SECOND: f64 = 4000.0;

/// Synthesize a speech-like preview waveform for a clip: syllable bursts
/// under a slower sentence-level swell, with formant-ish partials and a
/// noise floor for breathiness. Values are clamped to [-1, 1].
pub fn synthesize(duration: f64) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    let sample_count = (duration * SAMPLES_PER_SECOND).floor() as usize;
    let mut samples = Vec::with_capacity(sample_count);

    for i in 0..sample_count {
        let t = i as f64 / sample_count as f64;

        let syllables = (t * std::f64::consts::PI * 3.0 + rng.gen::<f64>() * 0.5)
            .sin()
            .abs();
        let sentence = 0.3 + (t * std::f64::consts::PI * 0.5).sin().abs() * 0.7;
        let envelope = syllables * sentence * (0.5 + rng.gen::<f64>() * 0.5);

        let voice = (t * std::f64::consts::PI * 200.0 + rng.gen::<f64>() * 2.0).sin() * 0.4
            + (t * std::f64::consts::PI * 500.0 + rng.gen::<f64>() * 3.0).sin() * 0.3
            + (t * std::f64::consts::PI * 1200.0 + rng.gen::<f64>() * 5.0).sin() * 0.2
            + (rng.gen::<f64>() - 0.5) * 0.3;

        samples.push((voice * envelope).clamp(-1.0, 1.0) as f32);
    }

    samples
}

/// Reduce raw samples to one peak (max absolute value) per bin, one bin per
/// rendered pixel column.
pub fn peaks(samples: &[f32], bins: usize) -> Vec<f32> {
    if samples.is_empty() || bins == 0 {
        return Vec::new();
    }

    (0..bins)
        .map(|bin| {
            let start = bin * samples.len() / bins;
            let end = ((bin + 1) * samples.len() / bins).max(start + 1);
            samples[start..end.min(samples.len())]
                .iter()
                .fold(0.0f32, |acc, s| acc.max(s.abs()))
        })
        .collect()
}
