#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use milestone_timeline::config::Settings;
use milestone_timeline::logging;

fn main() -> eframe::Result<()> {
    let settings = Settings::load_or_init();
    logging::init(&settings.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting milestone timeline");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 760.0])
            .with_min_inner_size([900.0, 480.0])
            .with_title("Milestone Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Milestone Timeline",
        options,
        Box::new(|cc| Ok(Box::new(app::MilestoneApp::new(cc, settings)))),
    )
}
