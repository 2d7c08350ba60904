mod app;
mod color;
mod config;
mod state;
mod ui;

use app::NoShowDashboardApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Medical Appointment No-Show Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(NoShowDashboardApp::new(&config)))),
    )
}
