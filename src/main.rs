mod app;
mod clipboard;
mod config;
mod dispatch;
mod focus;
mod http;
mod logging;
mod model;
mod perf;
mod response;
mod state;
mod storage;
mod ui;

use anyhow::{bail, Context, Result};
use app::App;
use state::UiState;
use storage::JsonFileStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load_config()?;

    if let Some(log_path) = config.log_path() {
        logging::init(&log_path, &config.log.level)?;
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting hermes");

    let client = http::build_client(&config).context("failed to build HTTP client")?;

    let Some(presets_path) = config.presets_path() else {
        bail!("cannot locate a presets file: set storage.presets_file or HOME");
    };
    let store = JsonFileStore::new(presets_path);
    info!(path = %store.path().display(), "using presets file");
    let state = UiState::new(Box::new(store));

    let mut app = App::new(state, client);
    app.run().await
}
