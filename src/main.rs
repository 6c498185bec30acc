mod core;
mod ui;

use eframe::NativeOptions;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("fadeline starting up");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_decorations(true)
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Fadeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Fadeline",
        options,
        Box::new(|cc| Ok(Box::new(ui::FadelineApp::new(cc)))),
    )
}
