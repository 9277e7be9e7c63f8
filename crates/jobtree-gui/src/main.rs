#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;

mod app;
mod components;
mod demo;
mod settings;

use app::JobTreeApp;
use settings::AppSettings;

fn main() -> eframe::Result<()> {
    // Log to stdout (if you run with `RUST_LOG=debug`).
    tracing_subscriber::fmt::init();

    let settings = AppSettings::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(settings.window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Job Tree",
        options,
        Box::new(|cc| Ok(Box::new(JobTreeApp::new(cc, settings)))),
    )
}
