//! snaptable-sender: serves screenshots of this machine's display

use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, anyhow};
use clap::Parser;
use snaptable_sender::{
    capture::{MockBackend, ScreenCapture, create_default_backend},
    server::{SenderState, serve},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "snaptable-sender")]
#[command(about = "Serve screenshots of this machine's display over HTTP")]
#[command(version)]
struct Cli {
    /// Interface to bind
    #[arg(long, env = "SENDER_BIND_HOST", default_value = "0.0.0.0")]
    host: String,
    /// Port to listen on
    #[arg(long, env = "SENDER_BIND_PORT", default_value_t = 5000)]
    port: u16,
    /// Directory every served screenshot is archived to
    #[arg(long, env = "SENDER_SCREENSHOT_DIR", default_value = "sent_screenshots")]
    screenshot_dir: PathBuf,
    /// Serve a synthetic test pattern instead of the real display
    #[arg(long)]
    mock: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snaptable_sender=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let backend: Arc<dyn ScreenCapture> = if cli.mock {
        Arc::new(MockBackend::new())
    } else {
        create_default_backend().map_err(|e| anyhow!("{} ({})", e, e.remediation_hint()))?
    };
    info!("Backend initialized: {}", backend.name());

    std::fs::create_dir_all(&cli.screenshot_dir)?;
    let state = SenderState::new(backend, cli.screenshot_dir, cli.port);

    serve(state, &cli.host, cli.port).await
}
