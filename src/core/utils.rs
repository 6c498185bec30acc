use crate::core::{Clip, ClipGeometry};
use eframe::egui;

/// Format a gain value for the tooltip. Silence gets its own spelling.
pub fn format_db(db: f64) -> String {
    if db == f64::NEG_INFINITY {
        "-∞ dB".to_string()
    } else {
        format!("{}{:.1} dB", if db >= 0.0 { "+" } else { "" }, db)
    }
}

/// Pixel layout of the track area: where each track row, clip and clip
/// header lives. Owned by the rendering layer and handed to the gesture
/// code so both agree on the same frame.
#[derive(Debug, Clone, Copy)]
pub struct TrackLayout {
    /// Top-left corner of the track area in screen space.
    pub origin: egui::Pos2,
    pub pixels_per_second: f32,
    pub track_height: f32,
    pub track_gap: f32,
    /// Gap above the first track.
    pub initial_gap: f32,
    /// Draggable title bar at the top of every clip.
    pub clip_header_height: f32,
    pub left_padding: f32,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            origin: egui::pos2(0.0, 0.0),
            pixels_per_second: 100.0,
            track_height: 114.0,
            track_gap: 2.0,
            initial_gap: 2.0,
            clip_header_height: 20.0,
            left_padding: 12.0,
        }
    }
}

impl TrackLayout {
    pub fn with_origin(mut self, origin: egui::Pos2) -> Self {
        self.origin = origin;
        self
    }

    pub fn track_top(&self, index: usize) -> f32 {
        self.origin.y + self.initial_gap + index as f32 * (self.track_height + self.track_gap)
    }

    /// Track row under a y position, bounded by the track count.
    pub fn track_index_at(&self, y: f32, track_count: usize) -> Option<usize> {
        let offset = y - self.origin.y - self.initial_gap;
        if offset < 0.0 {
            return None;
        }
        let index = (offset / (self.track_height + self.track_gap)).floor() as usize;
        (index < track_count).then_some(index)
    }

    /// Like [`Self::track_index_at`] but clamped into range, for sweeps
    /// that run past the first or last row.
    pub fn track_index_clamped(&self, y: f32, track_count: usize) -> usize {
        if track_count == 0 {
            return 0;
        }
        let offset = y - self.origin.y - self.initial_gap;
        let index = (offset / (self.track_height + self.track_gap)).floor();
        (index.max(0.0) as usize).min(track_count - 1)
    }

    pub fn row_contains(&self, index: usize, y: f32) -> bool {
        let top = self.track_top(index);
        y >= top && y <= top + self.track_height
    }

    pub fn time_at_x(&self, x: f32) -> f64 {
        ((x - self.origin.x - self.left_padding) / self.pixels_per_second) as f64
    }

    pub fn x_at_time(&self, time: f64) -> f32 {
        self.origin.x + self.left_padding + (time * self.pixels_per_second as f64) as f32
    }

    /// Full clip rectangle, header included.
    pub fn clip_rect(&self, clip: &Clip, track_index: usize) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.x_at_time(clip.start_time), self.track_top(track_index)),
            egui::vec2(
                (clip.duration * self.pixels_per_second as f64) as f32,
                self.track_height,
            ),
        )
    }

    pub fn clip_header_rect(&self, clip: &Clip, track_index: usize) -> egui::Rect {
        let rect = self.clip_rect(clip, track_index);
        egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), self.clip_header_height))
    }

    /// Frame of the clip body below the header, where the waveform and
    /// envelope are drawn and edited.
    pub fn clip_body_geometry(&self, clip: &Clip, track_index: usize) -> ClipGeometry {
        let rect = self.clip_rect(clip, track_index);
        ClipGeometry::new(
            rect.left(),
            rect.top() + self.clip_header_height,
            rect.width(),
            rect.height() - self.clip_header_height,
            self.pixels_per_second,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_db_spells_out_silence_and_sign() {
        assert_eq!(format_db(f64::NEG_INFINITY), "-∞ dB");
        assert_eq!(format_db(0.0), "+0.0 dB");
        assert_eq!(format_db(-5.95), "-6.0 dB");
        assert_eq!(format_db(11.96), "+12.0 dB");
    }

    #[test]
    fn track_rows_are_resolved_and_bounded() {
        let layout = TrackLayout::default();
        assert_eq!(layout.track_index_at(3.0, 3), Some(0));
        assert_eq!(layout.track_index_at(layout.track_top(2) + 1.0, 3), Some(2));
        assert_eq!(layout.track_index_at(layout.track_top(3) + 1.0, 3), None);
        assert_eq!(layout.track_index_at(-10.0, 3), None);
    }

    #[test]
    fn clip_geometry_lines_up_with_the_clip_rect() {
        let layout = TrackLayout::default();
        let clip = Clip::new("Vocals", 0.5, 2.0);
        let geom = layout.clip_body_geometry(&clip, 1);

        assert_eq!(geom.left, layout.x_at_time(0.5));
        assert_eq!(geom.top, layout.track_top(1) + layout.clip_header_height);
        assert_eq!(geom.width, 200.0);
        assert!((geom.duration() - 2.0).abs() < 1e-6);
        // The mapper's clip-relative time 0 is the clip's left edge.
        assert!((geom.x_to_time(layout.x_at_time(0.5))).abs() < 1e-6);
    }

    #[test]
    fn time_round_trips_through_layout() {
        let layout = TrackLayout::default().with_origin(egui::pos2(40.0, 8.0));
        let x = layout.x_at_time(1.25);
        assert!((layout.time_at_x(x) - 1.25).abs() < 1e-6);
    }
}
