use crate::core::{Project, StatusLine, TimeSelection};

/// Everything the editor shows and mutates: the project plus view-level
/// selection state. Gestures write into this through the dispatcher.
#[derive(Debug, Clone)]
pub struct AppState {
    pub project: Project,
    /// Externally toggled edit mode; envelope gestures only arm while on.
    pub envelope_mode: bool,
    pub selected_track_indices: Vec<usize>,
    pub focused_track: Option<usize>,
    pub time_selection: Option<TimeSelection>,
    /// Clip header currently under the cursor, for the grab highlight.
    pub hovered_clip_header: Option<(String, usize)>,
    pub status: StatusLine,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            project: Project::demo(),
            envelope_mode: false,
            selected_track_indices: Vec::new(),
            focused_track: None,
            time_selection: None,
            hovered_clip_header: None,
            status: StatusLine::new(),
        }
    }

    pub fn toggle_envelope_mode(&mut self) {
        self.envelope_mode = !self.envelope_mode;
        self.status.info(if self.envelope_mode {
            "Envelope editing on"
        } else {
            "Envelope editing off"
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
