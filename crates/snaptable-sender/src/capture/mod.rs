//! Display capture backends
//!
//! - [`XcapBackend`]: the primary monitor via `xcap` (feature `xcap-backend`)
//! - [`MockBackend`]: a synthetic gradient, for tests and headless machines
//!
//! ```rust,ignore
//! use snaptable_sender::capture::create_default_backend;
//!
//! let backend = create_default_backend()?;
//! let frame = backend.capture_screen().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::CaptureResult;

pub mod mock;
#[cfg(feature = "xcap-backend")]
pub mod xcap_backend;

pub use mock::MockBackend;
#[cfg(feature = "xcap-backend")]
pub use xcap_backend::XcapBackend;

/// Something that can capture the whole screen
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Captures the primary display as an RGBA frame
    async fn capture_screen(&self) -> CaptureResult<RgbaImage>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Creates the real capture backend for this build
///
/// Without the `xcap-backend` feature this returns
/// [`CaptureError::BackendNotAvailable`](crate::error::CaptureError::BackendNotAvailable).
pub fn create_default_backend() -> CaptureResult<Arc<dyn ScreenCapture>> {
    #[cfg(feature = "xcap-backend")]
    {
        Ok(Arc::new(XcapBackend::new()))
    }

    #[cfg(not(feature = "xcap-backend"))]
    {
        Err(crate::error::CaptureError::BackendNotAvailable {
            backend: "xcap".to_string(),
        })
    }
}
