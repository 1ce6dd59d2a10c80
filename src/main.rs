//! service-boot
//!
//! Web service bootstrap built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!   config.yaml ──▶ loader ──▶ ConfigStore (ArcSwap snapshot) ◀── watcher (notify)
//!                                   │
//!                    ┌──────────────┼───────────────┐
//!                    ▼              ▼               ▼
//!                 logging       HttpServer       handlers
//!                              request-id → trace → CORS → recovery
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use service_boot::config::{ConfigStore, ConfigWatcher, DEFAULT_CONFIG_PATH};
use service_boot::http::HttpServer;
use service_boot::lifecycle::{wait_for_signal, Shutdown};
use service_boot::observability::init_logging;

#[derive(Parser)]
#[command(name = "service-boot")]
#[command(about = "Web service bootstrap with hot-reloaded configuration", long_about = None)]
struct Cli {
    /// Configuration file (yaml, toml or json).
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A bad config at startup is fatal.
    let store = Arc::new(ConfigStore::initialize(&cli.config)?);
    let snapshot = store.snapshot();

    init_logging(&snapshot.log, snapshot.server.server_mode())?;

    tracing::info!(
        path = %cli.config.display(),
        name = %snapshot.server.name,
        mode = snapshot.server.server_mode().as_str(),
        "Configuration initialized"
    );

    // Dropping the watcher stops hot reload, so it lives until main returns.
    let _watcher = ConfigWatcher::new(store.clone()).run()?;

    let listener = TcpListener::bind(snapshot.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown.trigger_on(wait_for_signal()).await;
    });

    HttpServer::new(store).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
