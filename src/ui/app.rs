use crate::core::{AppState, GestureDispatcher, MessageLevel, Track};
use crate::ui::Arrangement;
use eframe::egui;

pub struct FadelineApp {
    state: AppState,
    dispatcher: GestureDispatcher,
    arrangement: Arrangement,
}

impl FadelineApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self {
            state: AppState::new(),
            dispatcher: GestureDispatcher::new(),
            arrangement: Arrangement::default(),
        };
        app.state.status.success("Initialized successfully");
        app
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.set_min_height(28.0);

            if ui
                .selectable_label(self.state.envelope_mode, "Envelope")
                .on_hover_text("Toggle gain envelope editing (E)")
                .clicked()
            {
                self.state.toggle_envelope_mode();
            }

            ui.separator();

            if ui.button("+ Add Track").clicked() {
                self.add_track();
            }

            if let Some(selection) = self.state.time_selection {
                ui.separator();
                ui.label(format!(
                    "{:.2}s – {:.2}s",
                    selection.start_time, selection.end_time
                ));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some((text, level)) = self.state.status.message() {
                    let color = match level {
                        MessageLevel::Info => ui.visuals().text_color(),
                        MessageLevel::Success => egui::Color32::from_rgb(110, 190, 120),
                        MessageLevel::Error => ui.visuals().error_fg_color,
                    };
                    ui.colored_label(color, text);
                }
            });
        });
    }

    fn draw_track_list(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            let mut clicked = None;
            for (index, track) in self.state.project.tracks.iter().enumerate() {
                let selected = self.state.selected_track_indices.contains(&index);
                let label = if self.state.focused_track == Some(index) {
                    format!("▶ {}", track.name)
                } else {
                    track.name.clone()
                };
                if ui.selectable_label(selected, label).clicked() {
                    clicked = Some(index);
                }
            }
            if let Some(index) = clicked {
                self.state.selected_track_indices = vec![index];
                self.state.focused_track = Some(index);
            }

            ui.add_space(8.0);
            if ui.button("+ Add Track").clicked() {
                self.add_track();
            }
        });
    }

    fn add_track(&mut self) {
        let name = format!("Track {}", self.state.project.tracks.len() + 1);
        self.state.project.tracks.push(Track::new(name.clone()));
        self.state.status.info(format!("Added {name}"));
    }
}

impl eframe::App for FadelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.status.update();

        if ctx.input(|i| i.key_pressed(egui::Key::E)) {
            self.state.toggle_envelope_mode();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::left("tracks")
            .default_width(220.0)
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_track_list(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.arrangement
                    .show(ui, &mut self.state, &mut self.dispatcher);
            });
        });

        // Keep pointer-driven edits responsive while a gesture is active.
        if !self.dispatcher.is_idle() {
            ctx.request_repaint();
        }
    }
}
