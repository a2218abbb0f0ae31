mod app;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;

use app::ExplorerApp;
use state::AppState;
use yelp_explorer::{Args, DatasetCache};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = args.pipeline_config()?;

    // A dataset that cannot be loaded ends the session before any window opens.
    let mut cache = DatasetCache::new(&args.data, config.max_rows);
    let dataset = cache
        .get_or_load()
        .with_context(|| format!("loading {}", args.data.display()))?;
    let state = AppState::new(cache, dataset, config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Yelp Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(ExplorerApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
