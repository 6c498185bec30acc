use crate::core::{
    hit_test, AppState, DragSession, EnvelopeDrag, TimeSelection, TrackLayout,
};
use eframe::egui::Pos2;

/// Dragging a clip by its header to reposition it.
#[derive(Debug, Clone)]
pub struct ClipDrag {
    pub clip_id: String,
    pub track_index: usize,
    /// Horizontal grab offset inside the header, so the clip doesn't jump.
    pub offset_x: f32,
}

/// Sweeping out a time-range selection.
#[derive(Debug, Clone)]
pub struct TimeSelectDrag {
    pub start_x: f32,
    pub start_track: usize,
}

#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    ClipMove(ClipDrag),
    Envelope(EnvelopeDrag),
    TimeSelect(TimeSelectDrag),
}

/// What sits under an idle cursor, for cursor-icon and highlight feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum Hover {
    None,
    ClipHeader { clip_id: String, track_index: usize },
    EnvelopeLine { clip_id: String, segment: usize },
}

/// Routes pointer input to at most one active gesture. Pointer-down decides
/// the owner by priority: clip header, then envelope editing (when armed),
/// then time-range selection. Move and release go only to that owner, and
/// releasing always returns to the gesture-free state.
#[derive(Debug, Default)]
pub struct GestureDispatcher {
    gesture: Gesture,
}

impl GestureDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    pub fn is_moving_clip(&self) -> bool {
        matches!(self.gesture, Gesture::ClipMove(_))
    }

    /// The envelope drag in flight, if that is the active gesture. The
    /// renderer reads the hidden set and live gain from here.
    pub fn envelope_session(&self) -> Option<&DragSession> {
        match &self.gesture {
            Gesture::Envelope(drag) => drag.session(),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, cursor: Pos2, state: &mut AppState, layout: &TrackLayout) {
        if !self.is_idle() {
            return;
        }

        let track_count = state.project.tracks.len();
        let clicked_track = layout.track_index_at(cursor.y, track_count);
        if let Some(index) = clicked_track {
            state.selected_track_indices = vec![index];
            state.focused_track = Some(index);
        }

        // Clip headers win in both modes.
        let mut header_hit = None;
        'tracks: for (track_index, track) in state.project.tracks.iter().enumerate() {
            if !layout.row_contains(track_index, cursor.y) {
                continue;
            }
            for clip in &track.clips {
                if layout.clip_header_rect(clip, track_index).contains(cursor) {
                    let offset_x = cursor.x - layout.clip_rect(clip, track_index).left();
                    header_hit = Some((clip.id.clone(), track_index, offset_x));
                    break 'tracks;
                }
            }
        }
        if let Some((clip_id, track_index, offset_x)) = header_hit {
            state.project.select_clip(&clip_id);
            if let Some(clip) = state.project.clip(&clip_id) {
                state.time_selection = Some(TimeSelection {
                    start_time: clip.start_time,
                    end_time: clip.end_time(),
                });
            }
            log::debug!("clip move gesture on {clip_id}");
            self.gesture = Gesture::ClipMove(ClipDrag {
                clip_id,
                track_index,
                offset_x,
            });
            return;
        }

        // Envelope editing, only while the mode is armed.
        if state.envelope_mode {
            for (track_index, track) in state.project.tracks.iter_mut().enumerate() {
                if !layout.row_contains(track_index, cursor.y) {
                    continue;
                }
                for clip in &mut track.clips {
                    let rect = layout.clip_rect(clip, track_index);
                    if cursor.x < rect.left() || cursor.x > rect.right() {
                        continue;
                    }
                    let geom = layout.clip_body_geometry(clip, track_index);
                    let mut drag = EnvelopeDrag::default();
                    if drag.pointer_down(cursor, clip, geom) {
                        self.gesture = Gesture::Envelope(drag);
                        return;
                    }
                }
            }
        }

        // Everything else sweeps a time-range selection.
        state.time_selection = None;
        self.gesture = Gesture::TimeSelect(TimeSelectDrag {
            start_x: cursor.x,
            start_track: layout.track_index_clamped(cursor.y, track_count),
        });
    }

    pub fn pointer_move(&mut self, cursor: Pos2, state: &mut AppState, layout: &TrackLayout) {
        match &mut self.gesture {
            Gesture::Idle => {}

            Gesture::ClipMove(drag) => {
                let new_start = layout.time_at_x(cursor.x - drag.offset_x).max(0.0);
                let track_count = state.project.tracks.len();
                let target = layout
                    .track_index_at(cursor.y, track_count)
                    .filter(|t| *t != drag.track_index);

                if let Some(target) = target {
                    // Carry the clip over to the row under the cursor.
                    let source = &mut state.project.tracks[drag.track_index].clips;
                    if let Some(pos) = source.iter().position(|c| c.id == drag.clip_id) {
                        let mut clip = source.remove(pos);
                        clip.start_time = new_start;
                        state.project.tracks[target].clips.push(clip);
                        drag.track_index = target;
                        state.selected_track_indices = vec![target];
                    }
                } else if let Some(clip) = state.project.clip_mut(&drag.clip_id) {
                    clip.start_time = new_start;
                }

                if state.time_selection.is_some() {
                    if let Some(clip) = state.project.clip(&drag.clip_id) {
                        state.time_selection = Some(TimeSelection {
                            start_time: clip.start_time,
                            end_time: clip.end_time(),
                        });
                    }
                }
            }

            Gesture::Envelope(drag) => {
                if let Some(clip_id) = drag.session().map(|s| s.clip_id.clone()) {
                    if let Some(clip) = state.project.clip_mut(&clip_id) {
                        drag.pointer_move(cursor, clip);
                    }
                }
            }

            Gesture::TimeSelect(drag) => {
                let a = layout.time_at_x(drag.start_x);
                let b = layout.time_at_x(cursor.x);
                state.time_selection = Some(TimeSelection::normalized(a, b));

                let track_count = state.project.tracks.len();
                if track_count > 0 {
                    let current = layout.track_index_clamped(cursor.y, track_count);
                    let lo = drag.start_track.min(current);
                    let hi = drag.start_track.max(current);
                    state.selected_track_indices = (lo..=hi).collect();
                }
            }
        }
    }

    pub fn pointer_up(&mut self, cursor: Pos2, state: &mut AppState, layout: &TrackLayout) {
        let track_count = state.project.tracks.len();
        if let Some(index) = layout.track_index_at(cursor.y, track_count) {
            state.focused_track = Some(index);
        }

        if let Gesture::Envelope(mut drag) = std::mem::take(&mut self.gesture) {
            if let Some(clip_id) = drag.session().map(|s| s.clip_id.clone()) {
                if let Some(clip) = state.project.clip_mut(&clip_id) {
                    drag.pointer_up(cursor, clip);
                }
            }
        }
        // Clip moves and selection sweeps have nothing to commit on release.
    }

    /// The pointer left the surface mid-gesture. Identical to a release at
    /// the last seen position so no gesture can dangle.
    pub fn pointer_leave(&mut self, state: &mut AppState) {
        if let Gesture::Envelope(mut drag) = std::mem::take(&mut self.gesture) {
            if let Some(clip_id) = drag.session().map(|s| s.clip_id.clone()) {
                if let Some(clip) = state.project.clip_mut(&clip_id) {
                    drag.pointer_leave(clip);
                }
            }
        }
    }

    /// What an idle cursor is over, for cursor icons and header highlights.
    pub fn hover(&self, cursor: Pos2, state: &AppState, layout: &TrackLayout) -> Hover {
        if !self.is_idle() {
            return Hover::None;
        }

        for (track_index, track) in state.project.tracks.iter().enumerate() {
            if !layout.row_contains(track_index, cursor.y) {
                continue;
            }
            for clip in &track.clips {
                if layout.clip_header_rect(clip, track_index).contains(cursor) {
                    return Hover::ClipHeader {
                        clip_id: clip.id.clone(),
                        track_index,
                    };
                }

                if state.envelope_mode {
                    let rect = layout.clip_rect(clip, track_index);
                    if cursor.x < rect.left() || cursor.x > rect.right() {
                        continue;
                    }
                    let geom = layout.clip_body_geometry(clip, track_index);
                    let segments =
                        hit_test::envelope_segments(clip.envelope.points(), &geom, clip.duration);
                    if let Some((segment, distance)) = hit_test::nearest_segment(cursor, &segments)
                    {
                        if distance < hit_test::LINE_HOVER_THRESHOLD {
                            return Hover::EnvelopeLine {
                                clip_id: clip.id.clone(),
                                segment,
                            };
                        }
                    }
                }
            }
        }

        Hover::None
    }
}
