mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use app::QuakeExplorerApp;
use eframe::egui;

/// Dataset loaded at startup, relative to the working directory.
const DEFAULT_DATA_PATH: &str = "cleaned_file.csv";

fn main() -> Result<()> {
    env_logger::init();

    let dataset = data::loader::load_file(Path::new(DEFAULT_DATA_PATH))
        .inspect_err(|e| log::error!("Cannot start without data: {e:#}"))
        .context("loading startup dataset")?;
    if dataset.is_empty() {
        log::warn!("{DEFAULT_DATA_PATH} has no complete rows; every view will be empty");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "🌍 Earthquake Dashboard: Magnitudes & Locations Over Time",
        options,
        Box::new(|_cc| Ok(Box::new(QuakeExplorerApp::new(dataset)))),
    )
    .map_err(|e| anyhow!("running UI: {e}"))
}
