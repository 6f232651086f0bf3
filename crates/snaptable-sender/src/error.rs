//! Error types for display capture
//!
//! Each error carries context plus a remediation hint for the operator of
//! the sender machine.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error type for screenshot capture and archiving
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No capture backend was compiled in or could be started
    #[error("Capture backend '{backend}' is not available")]
    BackendNotAvailable {
        /// Name of the unavailable backend
        backend: String,
    },

    /// The backend found no display to capture
    #[error("No display available for capture")]
    NoDisplay,

    /// The backend failed while capturing
    #[error("Screen capture failed: {reason}")]
    CaptureFailed {
        /// Backend-reported reason
        reason: String,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },

    /// I/O error while archiving
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CaptureError {
    /// Returns an actionable remediation hint for this error
    ///
    /// ```
    /// use snaptable_sender::error::CaptureError;
    ///
    /// let error = CaptureError::NoDisplay;
    /// assert!(error.remediation_hint().contains("display"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::BackendNotAvailable { .. } => {
                "Rebuild with `--features xcap-backend` for real display capture, or start the \
                 sender with --mock."
            }
            CaptureError::NoDisplay => {
                "No monitor was found. Run the sender inside a desktop session with a display \
                 attached."
            }
            CaptureError::CaptureFailed { .. } => {
                "Check that the sender has screen recording permission. On macOS grant it in \
                 System Settings > Privacy & Security > Screen Recording."
            }
            CaptureError::EncodingFailed { .. } => {
                "Encoding failed unexpectedly. Retry the capture; if it persists, report it."
            }
            CaptureError::IoError(_) => {
                "Check that the screenshot directory exists and is writable."
            }
        }
    }
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        tracing::error!(hint = self.remediation_hint(), "Error capturing screenshot: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": self.to_string()})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let error = CaptureError::BackendNotAvailable {
            backend: "xcap".to_string(),
        };
        assert_eq!(error.to_string(), "Capture backend 'xcap' is not available");
        assert!(error.remediation_hint().contains("xcap-backend"));

        let error = CaptureError::EncodingFailed {
            format: "png".to_string(),
            reason: "buffer too small".to_string(),
        };
        assert_eq!(error.to_string(), "Failed to encode image as png: buffer too small");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: CaptureError = io.into();
        assert!(matches!(error, CaptureError::IoError(_)));
        assert!(error.remediation_hint().contains("writable"));
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = CaptureError::NoDisplay.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"error": "No display available for capture"}));
    }
}
