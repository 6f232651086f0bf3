//! HTTP error envelope
//!
//! Every failed request answers `{"success": false, "error": "<message>"}`.
//! Client mistakes map to 400, bodies over the upload cap to 413 and
//! everything raised by the core services to 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snaptable_core::ServiceError;
use tracing::{error, warn};

/// Error returned by request handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was missing required input
    #[error("{0}")]
    BadRequest(String),

    /// The request body exceeded the configured cap
    #[error("{0}")]
    PayloadTooLarge(String),

    /// A core service failed
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error:   String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest(message) | ApiError::PayloadTooLarge(message) => {
                warn!("Rejected request: {}", message)
            }
            ApiError::Service(e) => error!(
                category = %e.category(),
                hint = e.remediation_hint(),
                "{}",
                e
            ),
        }

        let body = ErrorBody {
            success: false,
            error:   self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
