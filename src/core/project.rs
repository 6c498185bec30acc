use crate::core::{waveform, EnvelopeCurve};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub clips: Vec<Clip>,
}

/// An audio clip on a track. `duration` must be positive; the envelope
/// editor's coordinate mapping is undefined for an empty clip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    pub name: String,
    pub start_time: f64,
    pub duration: f64,
    #[serde(skip)]
    pub waveform: Vec<f32>,
    pub envelope: EnvelopeCurve,
    pub selected: bool,
}

/// A swept range on the timeline, kept normalized (start <= end).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSelection {
    pub start_time: f64,
    pub end_time: f64,
}

impl TimeSelection {
    pub fn normalized(a: f64, b: f64) -> Self {
        Self {
            start_time: a.min(b),
            end_time: a.max(b),
        }
    }
}

impl Clip {
    pub fn new(name: impl Into<String>, start_time: f64, duration: f64) -> Self {
        debug_assert!(duration > 0.0);
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            start_time,
            duration,
            waveform: waveform::synthesize(duration),
            envelope: EnvelopeCurve::new(),
            selected: false,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            clips: Vec::new(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    /// Starter session with a few clips to edit, mirroring a typical
    /// three-track voice/music arrangement.
    pub fn demo() -> Self {
        let mut project = Self::new("Untitled");

        let mut track1 = Track::new("Track 1");
        track1.clips.push(Clip::new("Vocals", 0.5, 2.0));
        track1.clips.push(Clip::new("Harmony", 3.0, 1.5));

        let mut track2 = Track::new("Track 2");
        track2.clips.push(Clip::new("Bass", 0.2, 1.2));
        track2.clips.push(Clip::new("Synth", 2.0, 2.5));
        track2.clips.push(Clip::new("Lead", 5.0, 1.0));

        let mut track3 = Track::new("Track 3");
        track3.clips.push(Clip::new("Drums", 1.0, 3.0));
        track3.clips.push(Clip::new("Percussion", 5.5, 1.5));

        project.tracks = vec![track1, track2, track3];
        project
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .find(|c| c.id == clip_id)
    }

    pub fn clip_mut(&mut self, clip_id: &str) -> Option<&mut Clip> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.clips.iter_mut())
            .find(|c| c.id == clip_id)
    }

    /// Mark one clip selected and clear the flag everywhere else.
    pub fn select_clip(&mut self, clip_id: &str) {
        for track in &mut self.tracks {
            for clip in &mut track.clips {
                clip.selected = clip.id == clip_id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_project_has_three_tracks_of_clips() {
        let project = Project::demo();
        assert_eq!(project.tracks.len(), 3);
        let clip_count: usize = project.tracks.iter().map(|t| t.clips.len()).sum();
        assert_eq!(clip_count, 7);
        for track in &project.tracks {
            for clip in &track.clips {
                assert!(clip.duration > 0.0);
                assert!(!clip.waveform.is_empty());
                assert!(clip.envelope.is_empty());
            }
        }
    }

    #[test]
    fn select_clip_is_exclusive() {
        let mut project = Project::demo();
        let first = project.tracks[0].clips[0].id.clone();
        let second = project.tracks[1].clips[0].id.clone();

        project.select_clip(&first);
        project.select_clip(&second);

        let selected: Vec<String> = project
            .tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .filter(|c| c.selected)
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(selected, vec![second]);
    }

    #[test]
    fn time_selection_normalizes_order() {
        let selection = TimeSelection::normalized(2.5, 1.0);
        assert_eq!(selection.start_time, 1.0);
        assert_eq!(selection.end_time, 2.5);
    }
}
