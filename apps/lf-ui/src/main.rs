#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod projection;

use std::path::PathBuf;

use app::LorenzViewer;
use lf_app::{RunConfig, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Optional first argument: YAML run configuration
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => load_config(&path),
        None => Ok(RunConfig::default()),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_title("Lorenz Attractor"),
        ..Default::default()
    };

    // Blocks until the window is closed
    eframe::run_native(
        "lorenzflow",
        options,
        Box::new(|_cc| Ok(Box::new(LorenzViewer::new(config)))),
    )
}
