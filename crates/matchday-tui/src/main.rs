// Matchday entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the HTTP API client
// 4. Create mpsc channels
// 5. Spawn the orchestrator task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matchday_core::api::HttpLeagueApi;
use matchday_core::app;
use matchday_core::config;
use matchday_tui::tui;

const LOG_FILE: &str = "matchday.log";

/// Covers the binary and both library crates by target prefix.
const DEFAULT_LOG_FILTER: &str = "matchday=info,warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    let log_path = init_tracing()?;
    info!(log = %log_path.display(), "Matchday starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout.as_secs(),
        default_sort = %config.ui.default_sort,
        "Config loaded"
    );

    // 3. Build the HTTP API client
    let api = HttpLeagueApi::from_config(&config.api).context("failed to build HTTP client")?;

    // 4. Create mpsc channels
    let (fetch_tx, fetch_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let view_state = tui::ViewState::new(config.api.base_url.as_str(), config.ui.highlight_rows);
    let app_state = app::AppState::new(config, Arc::new(api), fetch_tx);

    // 5. Spawn the orchestrator task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(fetch_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {:#}", e);
        }
    });

    // 6. Run the TUI event loop until the user presses 'q' or Ctrl+C
    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {:#}", e);
    }

    // 7. Cleanup: wait for the orchestrator to finish (with timeout)
    if tokio::time::timeout(Duration::from_secs(5), app_handle)
        .await
        .is_err()
    {
        error!("Application loop did not stop within 5s");
    }

    info!("Matchday shut down cleanly");
    Ok(())
}

/// Route tracing to `logs/matchday.log`, appending across sessions; the
/// terminal belongs to the TUI. `RUST_LOG` replaces the default filter.
fn init_tracing() -> anyhow::Result<PathBuf> {
    let path = std::env::current_dir()?.join("logs").join(LOG_FILE);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {e}"))?;

    Ok(path)
}
