//! Primary-monitor capture through `xcap`
//!
//! `xcap` calls block, so each capture runs on the blocking thread pool.

use async_trait::async_trait;
use image::RgbaImage;
use tracing::{debug, error, info};
use xcap::Monitor;

use super::ScreenCapture;
use crate::error::{CaptureError, CaptureResult};

/// Captures the primary monitor
#[derive(Debug, Default)]
pub struct XcapBackend;

impl XcapBackend {
    pub fn new() -> Self {
        Self
    }

    fn capture_primary() -> CaptureResult<RgbaImage> {
        let monitors = Monitor::all().map_err(|e| {
            error!("xcap failed to enumerate monitors: {}", e);
            CaptureError::CaptureFailed {
                reason: format!("failed to enumerate monitors: {}", e),
            }
        })?;

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or(CaptureError::NoDisplay)?;

        debug!(
            "Capturing monitor {}",
            monitor.name().unwrap_or_else(|_| "<unnamed>".to_string())
        );

        let image = monitor.capture_image().map_err(|e| {
            error!("xcap monitor capture failed: {}", e);
            CaptureError::CaptureFailed {
                reason: e.to_string(),
            }
        })?;

        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::CaptureFailed {
                reason: "captured an empty image".to_string(),
            });
        }

        info!("Captured display: {}x{}", image.width(), image.height());
        Ok(image)
    }
}

#[async_trait]
impl ScreenCapture for XcapBackend {
    async fn capture_screen(&self) -> CaptureResult<RgbaImage> {
        tokio::task::spawn_blocking(Self::capture_primary)
            .await
            .map_err(|e| {
                error!("Screen capture task panicked: {}", e);
                CaptureError::CaptureFailed {
                    reason: format!("capture task failed: {}", e),
                }
            })?
    }

    fn name(&self) -> &'static str {
        "xcap"
    }
}
