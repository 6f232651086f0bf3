//! Table extraction from images
//!
//! [`TableExtractor`] reads an image file, asks a [`VisionModel`] for the
//! table it contains and normalizes the JSON reply into a
//! [`Table`](crate::model::Table).
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use snaptable_core::extract::{OpenAiVisionClient, TableExtractor};
//!
//! let client = OpenAiVisionClient::new(config.vision.clone())?;
//! let extractor = TableExtractor::new(Arc::new(client));
//! let table = extractor.extract(&stored.path).await?;
//! ```

pub mod normalize;
pub mod prompts;
pub mod vision;

use std::{path::Path, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::Value;
use tracing::{debug, info};

pub use normalize::normalize;
pub use vision::{OpenAiVisionClient, VisionModel, VisionRequest};

use crate::{
    error::{ServiceError, ServiceResult},
    model::Table,
};

/// MIME type used when the image bytes are not recognized
const FALLBACK_MIME: &str = "image/png";

/// Extracts tables from image files through a vision model
#[derive(Clone)]
pub struct TableExtractor {
    model: Arc<dyn VisionModel>,
}

impl TableExtractor {
    /// Creates an extractor over an explicitly constructed model client
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    /// Extracts the table shown in the image at `image_path`
    ///
    /// # Errors
    ///
    /// - [`ServiceError::MissingApiKey`] - the model has no credential
    /// - [`ServiceError::ImageNotFound`] - `image_path` does not exist
    /// - [`ServiceError::Io`] - the image could not be read
    /// - [`ServiceError::ModelRequest`] - the model call failed
    /// - [`ServiceError::EmptyModelResponse`] - the model returned no content
    /// - [`ServiceError::ModelResponseParse`] - the content is not JSON
    /// - [`ServiceError::InvalidTableStructure`] - the JSON is not a table
    pub async fn extract(&self, image_path: &Path) -> ServiceResult<Table> {
        if !self.model.has_credentials() {
            return Err(ServiceError::MissingApiKey);
        }

        if !tokio::fs::try_exists(image_path).await.unwrap_or(false) {
            return Err(ServiceError::ImageNotFound {
                path: image_path.to_path_buf(),
            });
        }

        let bytes = tokio::fs::read(image_path).await?;
        let request = table_request(&bytes);

        info!(
            "Sending request to vision model for table extraction ({} bytes, {})",
            bytes.len(),
            request.mime_type
        );
        let content = self
            .model
            .complete_json(&request)
            .await?
            .filter(|content| !content.trim().is_empty())
            .ok_or(ServiceError::EmptyModelResponse)?;

        let value = parse_reply(&content)?;
        info!("Received table data from vision model");

        let table = normalize(value)?;
        debug!(
            "Normalized table: {} columns, {} rows",
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }
}

/// Builds the fixed extraction prompt around an image
pub fn table_request(image: &[u8]) -> VisionRequest {
    let mime_type = image::guess_format(image)
        .map(|format| format.to_mime_type())
        .unwrap_or(FALLBACK_MIME);

    VisionRequest {
        system:       prompts::SYSTEM_PROMPT.to_string(),
        instruction:  prompts::EXTRACTION_PROMPT.to_string(),
        image_base64: STANDARD.encode(image),
        mime_type:    mime_type.to_string(),
    }
}

/// Parses model content as JSON, keeping the raw text on failure
pub fn parse_reply(content: &str) -> ServiceResult<Value> {
    serde_json::from_str(content).map_err(|e| ServiceError::ModelResponseParse {
        reason:  e.to_string(),
        content: content.to_string(),
    })
}
