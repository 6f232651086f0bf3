//! snaptable-receiver: screenshot-to-table web application
//!
//! Reads configuration from the environment (and an optional `.env` file),
//! then serves the browser front end and JSON API.

use anyhow::Result;
use clap::Parser;
use snaptable_core::config::ReceiverConfig;
use snaptable_receiver::{AppState, serve};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "snaptable-receiver")]
#[command(about = "Request screenshots from a sender and extract tables from them")]
#[command(version)]
struct Cli {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let default_filter = format!(
        "snaptable_receiver={level},snaptable_core={level},tower_http={level}"
    );

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = ReceiverConfig::from_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_tracing(config.debug);

    config.ensure_directories()?;
    if !config.validate() {
        warn!("Configuration is incomplete; table extraction is disabled");
    }

    let state = AppState::from_config(&config)?;
    info!("Sender: {}", state.screenshots.base_url());

    let screenshots = state.screenshots.clone();
    tokio::spawn(async move {
        match screenshots.status().await {
            Ok(status) => info!(
                "Sender is {} at {}:{} ({} screenshots captured)",
                status.status, status.ip_address, status.port, status.screenshots_captured
            ),
            Err(e) => warn!("Sender is not reachable yet: {}", e),
        }
    });

    serve(state, &config.host, config.port).await
}
