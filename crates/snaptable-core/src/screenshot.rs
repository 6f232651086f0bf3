//! HTTP client for the screenshot sender
//!
//! [`ScreenshotClient::capture`] fetches a PNG from the sender's `/capture`
//! endpoint, archives a copy locally and hands the bytes back for immediate
//! use. Archiving is best effort: a failed write is logged, never returned.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};

use crate::{
    config::ReceiverConfig,
    error::{ServiceError, ServiceResult},
    model::SenderStatus,
    util::timestamp::unique_filename,
};

/// Client for the sender's HTTP endpoints
#[derive(Debug, Clone)]
pub struct ScreenshotClient {
    base_url:    String,
    archive_dir: PathBuf,
    timeout:     Duration,
    client:      Client,
}

impl ScreenshotClient {
    /// Creates a client for the sender at `base_url`
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        archive_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InvalidConfig {
                key:    "SENDER_IP".to_string(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            archive_dir: archive_dir.into(),
            timeout,
            client,
        })
    }

    /// Creates a client for the configured sender and screenshot directory
    pub fn from_config(config: &ReceiverConfig) -> ServiceResult<Self> {
        Self::new(
            config.sender_url(),
            config.screenshots_dir.clone(),
            config.screenshot_timeout,
        )
    }

    /// Base URL of the sender
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Directory captured screenshots are archived to
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    /// Requests a screenshot from the sender
    ///
    /// # Errors
    ///
    /// - [`ServiceError::SenderUnreachable`] - connection refused, DNS or
    ///   timeout
    /// - [`ServiceError::SenderStatus`] - the sender answered with a non-200
    ///   status
    pub async fn capture(&self) -> ServiceResult<Bytes> {
        let url = format!("{}/capture", self.base_url);
        info!("Requesting screenshot from {}", url);

        let response = self.get(&url).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let error = ServiceError::SenderStatus {
                status: status.as_u16(),
            };
            error!("{}", error);
            return Err(error);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.unreachable(&url, &e))?;

        match self.archive(&bytes).await {
            Ok(path) => info!("Screenshot saved to {}", path.display()),
            Err(e) => warn!("Could not archive screenshot: {}", e),
        }

        Ok(bytes)
    }

    /// Queries the sender's `/status` endpoint
    ///
    /// # Errors
    ///
    /// Transport errors as for [`capture`](Self::capture), plus
    /// [`ServiceError::InvalidSenderResponse`] when the body is not a status.
    pub async fn status(&self) -> ServiceResult<SenderStatus> {
        let url = format!("{}/status", self.base_url);
        let response = self.get(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::SenderStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<SenderStatus>()
            .await
            .map_err(|e| ServiceError::InvalidSenderResponse {
                reason: e.to_string(),
            })
    }

    async fn get(&self, url: &str) -> ServiceResult<reqwest::Response> {
        self.client.get(url).send().await.map_err(|e| {
            let error = self.unreachable(url, &e);
            error!("{}", error);
            error
        })
    }

    fn unreachable(&self, url: &str, e: &reqwest::Error) -> ServiceError {
        let reason = if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs_f32())
        } else {
            e.to_string()
        };
        ServiceError::SenderUnreachable {
            url: url.to_string(),
            reason,
        }
    }

    async fn archive(&self, bytes: &[u8]) -> ServiceResult<PathBuf> {
        tokio::fs::create_dir_all(&self.archive_dir).await?;
        let path = self.archive_dir.join(unique_filename("screenshot", "png"));
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}
