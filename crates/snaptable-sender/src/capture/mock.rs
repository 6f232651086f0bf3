//! Mock capture backend
//!
//! Generates a vertical blue-to-cyan gradient instead of reading a display.
//! Supports an artificial delay and error injection for exercising the
//! server's timing and error paths.
//!
//! ```
//! use std::time::Duration;
//!
//! use snaptable_sender::capture::{MockBackend, ScreenCapture};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockBackend::with_size(64, 32).with_delay(Duration::from_millis(5));
//!     let frame = backend.capture_screen().await.unwrap();
//!     assert_eq!(frame.dimensions(), (64, 32));
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use tokio::time::sleep;

use super::ScreenCapture;
use crate::error::{CaptureError, CaptureResult};

/// Default frame size, a common display resolution
const DEFAULT_SIZE: (u32, u32) = (1920, 1080);

/// Mock capture backend for testing and development
#[derive(Debug)]
pub struct MockBackend {
    width:           u32,
    height:          u32,
    /// Optional delay to simulate capture latency
    delay:           Option<Duration>,
    /// Optional error returned by every capture
    error_injection: Option<CaptureError>,
}

impl MockBackend {
    /// Creates a backend producing 1920x1080 frames
    pub fn new() -> Self {
        Self::with_size(DEFAULT_SIZE.0, DEFAULT_SIZE.1)
    }

    /// Creates a backend producing frames of the given size
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            delay: None,
            error_injection: None,
        }
    }

    /// Sleeps for `delay` before every capture
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fails every capture with `error`
    pub fn with_error(mut self, error: CaptureError) -> Self {
        self.error_injection = Some(error);
        self
    }

    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    fn check_error_injection(&self) -> CaptureResult<()> {
        if let Some(ref error) = self.error_injection {
            return Err(match error {
                CaptureError::BackendNotAvailable { backend } => {
                    CaptureError::BackendNotAvailable {
                        backend: backend.clone(),
                    }
                }
                CaptureError::NoDisplay => CaptureError::NoDisplay,
                CaptureError::CaptureFailed { reason } => CaptureError::CaptureFailed {
                    reason: reason.clone(),
                },
                CaptureError::EncodingFailed { format, reason } => CaptureError::EncodingFailed {
                    format: format.clone(),
                    reason: reason.clone(),
                },
                CaptureError::IoError(e) => {
                    CaptureError::IoError(std::io::Error::new(e.kind(), e.to_string()))
                }
            });
        }
        Ok(())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertical gradient from blue to cyan
pub fn test_pattern(width: u32, height: u32) -> RgbaImage {
    let start = [0f32, 0.0, 255.0];
    let end = [0f32, 255.0, 255.0];

    RgbaImage::from_fn(width, height, |_x, y| {
        let ratio = y as f32 / height.max(1) as f32;
        Rgba([
            (start[0] * (1.0 - ratio) + end[0] * ratio) as u8,
            (start[1] * (1.0 - ratio) + end[1] * ratio) as u8,
            (start[2] * (1.0 - ratio) + end[2] * ratio) as u8,
            255,
        ])
    })
}

#[async_trait]
impl ScreenCapture for MockBackend {
    async fn capture_screen(&self) -> CaptureResult<RgbaImage> {
        self.apply_delay().await;
        self.check_error_injection()?;
        Ok(test_pattern(self.width, self.height))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
