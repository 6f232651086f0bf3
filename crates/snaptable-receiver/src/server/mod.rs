//! Receiver web server

mod handlers;
mod routes;

pub use routes::create_router;

use std::{path::PathBuf, sync::Arc};

use snaptable_core::{
    ServiceResult,
    config::{DEFAULT_MAX_BODY_BYTES, ReceiverConfig},
    extract::{OpenAiVisionClient, TableExtractor},
    screenshot::ScreenshotClient,
    util::image_store::ImageStore,
};
use tokio::net::TcpListener;
use tracing::info;

/// Shared state for the web server
#[derive(Clone)]
pub struct AppState {
    pub screenshots:    Arc<ScreenshotClient>,
    pub images:         Arc<ImageStore>,
    pub extractor:      TableExtractor,
    /// Directory holding `index.html` and the `/static` assets
    pub static_dir:     PathBuf,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(
        screenshots: ScreenshotClient,
        images: ImageStore,
        extractor: TableExtractor,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            screenshots: Arc::new(screenshots),
            images: Arc::new(images),
            extractor,
            static_dir: static_dir.into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Replaces the request body cap
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Builds the production services from configuration
    pub fn from_config(config: &ReceiverConfig) -> ServiceResult<Self> {
        let screenshots = ScreenshotClient::from_config(config)?;
        let images = ImageStore::new(config.cropped_dir.clone(), config.temp_dir.clone());
        let vision = OpenAiVisionClient::new(config.vision.clone())?;

        Ok(Self::new(
            screenshots,
            images,
            TableExtractor::new(Arc::new(vision)),
            config.static_dir.clone(),
        )
        .with_max_body_bytes(config.max_body_bytes))
    }
}

/// Binds `host:port` and serves until the process is stopped
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind((host, port)).await?;
    info!(
        "Starting Screenshot to Table application on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
