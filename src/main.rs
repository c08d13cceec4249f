//! Listing Charts - New York City rental listings chart viewer
//!
//! Loads the listings CSV once and draws one of thirteen canned charts on demand.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Context;
use config::AppConfig;
use data::ListingTable;
use eframe::egui;
use gui::ListingChartsApp;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let table = ListingTable::load_csv(&config.csv_path)
        .with_context(|| format!("Failed to load listings from {}", config.csv_path.display()))?;
    log::info!(
        "Loaded {} rows, {} columns from {}",
        table.row_count(),
        table.column_names().len(),
        table.source().display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title(config.window_title.clone()),
        ..Default::default()
    };

    let title = config.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(ListingChartsApp::new(cc, table, config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
