use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod dataset;
mod lookup;
mod server;
mod settings;
mod utils;
mod wiki;

use dataset::TravelDataset;
use server::{start_server, AppState};
use settings::Settings;
use wiki::WikiClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wanderpixie=info")),
        )
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    let dataset = match settings.dataset_path {
        Some(ref path) => TravelDataset::from_file(Path::new(path))?,
        None => TravelDataset::bundled()?,
    };
    tracing::info!(places = dataset.len(), "curated dataset loaded");

    let wiki = WikiClient::new(
        &settings.wiki_api_base,
        Duration::from_secs(settings.wiki_timeout_secs),
    )?;

    if settings.auto_open_browser {
        let url = format!("http://127.0.0.1:{}", settings.port);
        if let Err(e) = utils::open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let state = AppState {
        dataset: Arc::new(dataset),
        wiki,
        settings: Arc::new(settings),
    };

    start_server(state).await
}
