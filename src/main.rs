//! add-header proxy
//!
//! A reverse proxy that injects configured headers into requests bound for the origin.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────────────────────────────────────────────────┐
//!     ──────────────────▶│  http server ──▶ routing ──▶ headers (add_header)   │
//!                        │  (request id,    (remap       injector + rules       │
//!                        │   trace,          match)          │                  │
//!                        │   timeout)                        ▼                  │
//!     Client Response    │                           hyper-util client ────────┼──▶ Origin
//!     ◀──────────────────│◀──────────────────────────────────┘                  │
//!                        │                                                      │
//!                        │  config (TOML, validated)     observability (tracing)│
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use add_header::config::{read_config, validate_config, LoadError, ProxyConfig};
use add_header::headers::diagnostics::{PLUGIN_NAME, PLUGIN_VERSION};
use add_header::observability::logging;
use add_header::HttpServer;

#[derive(Parser)]
#[command(name = "add-header")]
#[command(about = "Reverse proxy that adds configured headers to origin requests", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };

    // Installed before validation so rule diagnostics are not lost.
    logging::init(&config.observability)?;

    validate_config(&config).map_err(LoadError::Validation)?;

    if cli.check {
        println!("configuration OK: {} remap entries", config.remap.len());
        return Ok(());
    }

    tracing::info!("{} plugin is initialized, version: {}", PLUGIN_NAME, PLUGIN_VERSION);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        remap_entries = config.remap.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config)?;
    let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
