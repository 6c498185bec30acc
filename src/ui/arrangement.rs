use crate::core::*;
use eframe::egui;
use egui::{Align2, Color32, FontId, StrokeKind};
use std::collections::HashSet;

const CANVAS_WIDTH: f32 = 2000.0;
const RULER_HEIGHT: f32 = 40.0;

const CLIP_BODY_COLOR: Color32 = Color32::from_rgb(47, 66, 94);
const CLIP_BODY_ENVELOPE_COLOR: Color32 = Color32::from_rgb(56, 76, 104);
const CLIP_HEADER_COLOR: Color32 = Color32::from_rgb(64, 108, 168);
const CLIP_HEADER_HOVER_COLOR: Color32 = Color32::from_rgb(84, 128, 188);
const WAVEFORM_COLOR: Color32 = Color32::from_rgb(130, 170, 220);
const ENVELOPE_LINE_COLOR: Color32 = Color32::from_rgb(240, 210, 80);
const SELECTION_COLOR: Color32 = Color32::from_rgba_premultiplied(40, 60, 80, 80);

/// The track area: ruler, track rows, clips with waveform and envelope
/// overlays, and the pointer plumbing that feeds the gesture dispatcher.
pub struct Arrangement {
    layout: TrackLayout,
}

impl Default for Arrangement {
    fn default() -> Self {
        Self {
            layout: TrackLayout::default(),
        }
    }
}

impl Arrangement {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut AppState,
        dispatcher: &mut GestureDispatcher,
    ) {
        let track_count = state.project.tracks.len();
        let tracks_height = self.layout.initial_gap
            + track_count as f32 * (self.layout.track_height + self.layout.track_gap);
        let desired = egui::vec2(
            CANVAS_WIDTH.max(ui.available_width()),
            (RULER_HEIGHT + tracks_height + 40.0).max(ui.available_height()),
        );
        let (rect, _response) = ui.allocate_exact_size(desired, egui::Sense::click_and_drag());

        ui.painter()
            .rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let layout = self
            .layout
            .with_origin(rect.min + egui::vec2(0.0, RULER_HEIGHT));

        let hover_pos = ui.input(|i| i.pointer.hover_pos());
        let hovered = match hover_pos {
            Some(pos) if rect.contains(pos) => dispatcher.hover(pos, state, &layout),
            _ => Hover::None,
        };

        self.draw_ruler(ui, rect, &layout, state.time_selection);
        self.draw_tracks(ui, rect, state, dispatcher, &layout, &hovered);
        self.draw_tooltip(ui, dispatcher);

        self.handle_pointer(ui, rect, state, dispatcher, &layout, &hovered);
    }

    fn draw_ruler(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        layout: &TrackLayout,
        selection: Option<TimeSelection>,
    ) {
        let ruler_rect =
            egui::Rect::from_min_size(rect.min, egui::vec2(rect.width(), RULER_HEIGHT));
        ui.painter()
            .rect_filled(ruler_rect, 0.0, ui.visuals().window_fill);

        if let Some(selection) = selection {
            let highlight = egui::Rect::from_min_max(
                egui::pos2(layout.x_at_time(selection.start_time), ruler_rect.top()),
                egui::pos2(layout.x_at_time(selection.end_time), ruler_rect.bottom()),
            );
            ui.painter().rect_filled(highlight, 0.0, SELECTION_COLOR);
        }

        let seconds = ((rect.width() - layout.left_padding) / layout.pixels_per_second) as i32;
        for time in 0..=seconds {
            let x = layout.x_at_time(time as f64);
            ui.painter().line_segment(
                [
                    egui::pos2(x, ruler_rect.bottom() - 8.0),
                    egui::pos2(x, ruler_rect.bottom()),
                ],
                (1.0, ui.visuals().text_color()),
            );
            ui.painter().text(
                egui::pos2(x + 3.0, ruler_rect.bottom() - 16.0),
                Align2::LEFT_TOP,
                format!("{}:{:02}", time / 60, time % 60),
                FontId::monospace(10.0),
                ui.visuals().weak_text_color(),
            );
        }
    }

    fn draw_tracks(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        state: &AppState,
        dispatcher: &GestureDispatcher,
        layout: &TrackLayout,
        hovered: &Hover,
    ) {
        for (track_index, track) in state.project.tracks.iter().enumerate() {
            let track_rect = egui::Rect::from_min_size(
                egui::pos2(rect.left(), layout.track_top(track_index)),
                egui::vec2(rect.width(), layout.track_height),
            );

            let selected = state.selected_track_indices.contains(&track_index);
            let row_fill = if selected {
                ui.visuals().faint_bg_color.linear_multiply(1.4)
            } else {
                ui.visuals().faint_bg_color
            };
            ui.painter().rect_filled(track_rect, 0.0, row_fill);

            if state.focused_track == Some(track_index) {
                ui.painter().line_segment(
                    [track_rect.left_top(), track_rect.left_bottom()],
                    (2.0, ui.visuals().selection.stroke.color),
                );
            }

            for clip in &track.clips {
                self.draw_clip(ui, state, dispatcher, layout, clip, track_index, hovered);
            }

            if let Some(selection) = state.time_selection {
                let highlight = egui::Rect::from_min_max(
                    egui::pos2(layout.x_at_time(selection.start_time), track_rect.top()),
                    egui::pos2(layout.x_at_time(selection.end_time), track_rect.bottom()),
                );
                ui.painter().rect_filled(highlight, 0.0, SELECTION_COLOR);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_clip(
        &self,
        ui: &egui::Ui,
        state: &AppState,
        dispatcher: &GestureDispatcher,
        layout: &TrackLayout,
        clip: &Clip,
        track_index: usize,
        hovered: &Hover,
    ) {
        let header_rect = layout.clip_header_rect(clip, track_index);
        let geom = layout.clip_body_geometry(clip, track_index);
        let body_rect = geom.rect();

        let body_color = if state.envelope_mode {
            CLIP_BODY_ENVELOPE_COLOR
        } else {
            CLIP_BODY_COLOR
        };
        ui.painter().rect_filled(body_rect, 0.0, body_color);

        let header_hovered = matches!(
            hovered,
            Hover::ClipHeader { clip_id, .. } if *clip_id == clip.id
        );
        let header_color = if header_hovered {
            CLIP_HEADER_HOVER_COLOR
        } else {
            CLIP_HEADER_COLOR
        };
        ui.painter().rect_filled(header_rect, 0.0, header_color);
        ui.painter().text(
            header_rect.left_center() + egui::vec2(4.0, 0.0),
            Align2::LEFT_CENTER,
            &clip.name,
            FontId::proportional(11.0),
            Color32::WHITE,
        );

        if clip.selected {
            ui.painter().rect_stroke(
                egui::Rect::from_min_max(header_rect.min, body_rect.max),
                0.0,
                egui::Stroke::new(1.5, ui.visuals().selection.stroke.color),
                StrokeKind::Inside,
            );
        }

        self.draw_waveform(ui, clip, body_rect);

        // The envelope overlay is always visible once a clip has points;
        // handles only show up in edit mode.
        if state.envelope_mode || !clip.envelope.is_empty() {
            self.draw_envelope(ui, state, dispatcher, clip, &geom, hovered);
        }
    }

    fn draw_waveform(&self, ui: &egui::Ui, clip: &Clip, body_rect: egui::Rect) {
        let bins = body_rect.width().max(1.0) as usize;
        let peaks = waveform::peaks(&clip.waveform, bins);
        let mid_y = body_rect.center().y;
        let half_height = body_rect.height() * 0.5 - 2.0;

        for (i, peak) in peaks.iter().enumerate() {
            let x = body_rect.left() + i as f32 + 0.5;
            let extent = peak * half_height;
            ui.painter().line_segment(
                [
                    egui::pos2(x, mid_y - extent),
                    egui::pos2(x, mid_y + extent),
                ],
                (1.0, WAVEFORM_COLOR),
            );
        }
    }

    fn draw_envelope(
        &self,
        ui: &egui::Ui,
        state: &AppState,
        dispatcher: &GestureDispatcher,
        clip: &Clip,
        geom: &ClipGeometry,
        hovered: &Hover,
    ) {
        let no_hidden = HashSet::new();
        let (hidden, dragged_id) = match dispatcher.envelope_session() {
            Some(session) if session.clip_id == clip.id => {
                (&session.hidden, Some(session.point_id.as_str()))
            }
            _ => (&no_hidden, None),
        };

        let visible: Vec<&EnvelopePoint> = clip.envelope.visible_points(hidden).collect();
        let segments = hit_test::envelope_segments(visible.iter().copied(), geom, clip.duration);

        let hovered_segment = match hovered {
            Hover::EnvelopeLine { clip_id, segment } if *clip_id == clip.id => Some(*segment),
            _ => None,
        };

        for (i, segment) in segments.iter().enumerate() {
            let width = if hovered_segment == Some(i) { 2.5 } else { 1.5 };
            ui.painter()
                .line_segment([segment.start, segment.end], (width, ENVELOPE_LINE_COLOR));
        }

        if !state.envelope_mode {
            return;
        }

        for point in visible {
            let pos = geom.point_pos(point.time, point.db);
            let is_dragged = dragged_id == Some(point.id.as_str());
            let radius = if is_dragged { 5.0 } else { 3.5 };
            ui.painter().circle_filled(pos, radius, Color32::WHITE);
            ui.painter()
                .circle_stroke(pos, radius, (1.0, ENVELOPE_LINE_COLOR));
        }
    }

    fn draw_tooltip(&self, ui: &egui::Ui, dispatcher: &GestureDispatcher) {
        let Some(session) = dispatcher.envelope_session() else {
            return;
        };

        let text = format_db(session.live_db);
        let galley = ui
            .painter()
            .layout_no_wrap(text, FontId::monospace(11.0), Color32::WHITE);
        let pos = session.last_pos + egui::vec2(10.0, -25.0);
        let padding = egui::vec2(5.0, 3.0);
        let background = egui::Rect::from_min_size(pos, galley.size() + padding * 2.0);

        ui.painter()
            .rect_filled(background, 3.0, Color32::from_black_alpha(220));
        ui.painter().galley(pos + padding, galley, Color32::WHITE);
    }

    fn handle_pointer(
        &self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        state: &mut AppState,
        dispatcher: &mut GestureDispatcher,
        layout: &TrackLayout,
        hovered: &Hover,
    ) {
        let (hover_pos, pressed, released) = ui.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });

        match hover_pos {
            Some(pos) if rect.contains(pos) => {
                if pressed {
                    dispatcher.pointer_down(pos, state, layout);
                } else if released {
                    dispatcher.pointer_up(pos, state, layout);
                } else {
                    dispatcher.pointer_move(pos, state, layout);
                }
            }
            // Off the surface counts as a release at the last position.
            _ => dispatcher.pointer_leave(state),
        }

        state.hovered_clip_header = match hovered {
            Hover::ClipHeader {
                clip_id,
                track_index,
            } => Some((clip_id.clone(), *track_index)),
            _ => None,
        };

        let icon = if dispatcher.is_moving_clip() {
            egui::CursorIcon::Grabbing
        } else {
            match hovered {
                Hover::ClipHeader { .. } => egui::CursorIcon::Grab,
                Hover::EnvelopeLine { .. } => egui::CursorIcon::Copy,
                Hover::None => egui::CursorIcon::Default,
            }
        };
        ui.output_mut(|o| o.cursor_icon = icon);
    }
}
