mod app;
mod color;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use eframe::egui;
use games_dashboard::config::DashboardConfig;
use games_dashboard::data::load_file;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load(&std::env::current_dir()?);
    let dataset = load_file(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;
    let state = AppState::new(Arc::new(dataset), config.year_bounds);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Game Industry Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("UI failed: {e}"))
}
