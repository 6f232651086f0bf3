//! Sender HTTP server

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use snaptable_core::{model::SenderStatus, util::timestamp::unique_filename};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    capture::ScreenCapture,
    encode::encode_png,
    error::{CaptureError, CaptureResult},
    net::local_ip_address,
};

/// Shared state for the sender
#[derive(Clone)]
pub struct SenderState {
    pub backend:        Arc<dyn ScreenCapture>,
    /// Archive of every screenshot served
    pub screenshot_dir: PathBuf,
    /// Port reported by `/status`
    pub port:           u16,
}

impl SenderState {
    pub fn new(
        backend: Arc<dyn ScreenCapture>,
        screenshot_dir: impl Into<PathBuf>,
        port: u16,
    ) -> Self {
        Self {
            backend,
            screenshot_dir: screenshot_dir.into(),
            port,
        }
    }
}

/// Create the sender router
pub fn create_router(state: SenderState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/capture", get(capture))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Number of entries in the archive directory; 0 if it does not exist
pub fn count_screenshots(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// GET /capture
async fn capture(State(state): State<SenderState>) -> CaptureResult<impl IntoResponse> {
    let frame = state.backend.capture_screen().await?;

    let png = tokio::task::spawn_blocking(move || encode_png(&frame))
        .await
        .map_err(|e| CaptureError::EncodingFailed {
            format: "png".to_string(),
            reason: format!("encoder task failed: {}", e),
        })??;

    tokio::fs::create_dir_all(&state.screenshot_dir).await?;
    let path = state
        .screenshot_dir
        .join(unique_filename("screenshot", "png"));
    info!("Capturing screenshot to {}", path.display());
    tokio::fs::write(&path, &png).await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// GET /status
async fn status(State(state): State<SenderState>) -> Json<SenderStatus> {
    Json(SenderStatus::running(
        local_ip_address().to_string(),
        state.port,
        count_screenshots(&state.screenshot_dir),
    ))
}

/// GET /
async fn home(State(state): State<SenderState>) -> Html<String> {
    Html(format!(
        r#"<html>
<head>
    <title>Screenshot Sender</title>
    <style>
        body {{ font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }}
        h1 {{ color: #4285F4; }}
        .status {{ padding: 15px; background-color: #d9edf7; border-radius: 4px; margin: 20px 0; }}
        .info {{ margin-bottom: 10px; }}
    </style>
</head>
<body>
    <h1>Screenshot Sender</h1>
    <div class="status">
        <h2>Status: Running</h2>
        <div class="info">The server is running and ready to capture screenshots.</div>
        <div class="info">IP Address: {ip}</div>
        <div class="info">Port: {port}</div>
        <div class="info">Backend: {backend}</div>
    </div>
    <h3>API Endpoints:</h3>
    <ul>
        <li><strong>/capture</strong> - Capture and return a screenshot</li>
        <li><strong>/status</strong> - Check server status</li>
    </ul>
</body>
</html>
"#,
        ip = local_ip_address(),
        port = state.port,
        backend = state.backend.name(),
    ))
}

/// Binds `host:port`, logs the address to configure on the receiver and
/// serves until the process is stopped
pub async fn serve(state: SenderState, host: &str, port: u16) -> anyhow::Result<()> {
    let backend = state.backend.name();
    let app = create_router(state);
    let listener = TcpListener::bind((host, port)).await?;

    let ip = local_ip_address();
    info!("{}", "=".repeat(60));
    info!("  Screenshot Sender Running at http://{}:{}", ip, port);
    info!("{}", "=".repeat(60));
    info!("Capture backend: {}", backend);
    info!("Set SENDER_IP={} and SENDER_PORT={} on the receiver.", ip, port);

    axum::serve(listener, app).await?;
    Ok(())
}
