//! Error types for screenshot retrieval and table extraction
//!
//! Every failure a receiver request can hit is a [`ServiceError`] variant.
//! Each variant belongs to one [`ErrorCategory`] and carries an actionable
//! remediation hint that the web layer logs next to the error message.
//!
//! ```
//! use snaptable_core::error::{ErrorCategory, ServiceError};
//!
//! let error = ServiceError::SenderStatus { status: 503 };
//! assert_eq!(error.category(), ErrorCategory::Transport);
//! assert!(error.to_string().contains("503"));
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse classification of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Missing credential or unusable configuration value
    Configuration,
    /// Referenced file does not exist
    NotFound,
    /// Remote peer unreachable or answered with a failure status
    Transport,
    /// Malformed base64 payload
    Decode,
    /// Local file read/write failure
    Io,
    /// Remote peer answered with content we cannot interpret
    UpstreamFormat,
}

impl ErrorCategory {
    /// Returns the category as a snake_case string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::NotFound => "not_found",
            ErrorCategory::Transport => "transport",
            ErrorCategory::Decode => "decode",
            ErrorCategory::Io => "io",
            ErrorCategory::UpstreamFormat => "upstream_format",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for receiver-side operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No vision-model API key is configured
    #[error("OpenAI API key is not configured. Please set OPENAI_API_KEY in config.")]
    MissingApiKey,

    /// A configuration value could not be used
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidConfig {
        /// Environment variable or setting name
        key:    String,
        /// Why the value was rejected
        reason: String,
    },

    /// Image file to extract from does not exist
    #[error("Image file not found: {}", path.display())]
    ImageNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Sender could not be reached at all (refused, DNS, timeout)
    #[error("Error connecting to sender at {url}: {reason}")]
    SenderUnreachable {
        /// URL that was requested
        url:    String,
        /// Underlying transport failure
        reason: String,
    },

    /// Sender answered with a non-200 status
    #[error("Failed to capture screenshot. Status code: {status}")]
    SenderStatus {
        /// HTTP status code returned by the sender
        status: u16,
    },

    /// Sender answered with a body we could not decode
    #[error("Unexpected response from sender: {reason}")]
    InvalidSenderResponse {
        /// Decode failure
        reason: String,
    },

    /// Browser payload is not valid base64
    #[error("Error decoding image data: {reason}")]
    InvalidBase64 {
        /// Decoder message
        reason: String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vision model request failed before a reply was obtained
    #[error("Error calling vision model: {reason}")]
    ModelRequest {
        /// Transport failure or HTTP status with body
        reason: String,
    },

    /// Vision model returned no message content
    #[error("No content received from OpenAI API")]
    EmptyModelResponse,

    /// Vision model content is not JSON
    #[error("Error parsing JSON response from OpenAI: {reason}\nResponse content: {content}")]
    ModelResponseParse {
        /// Parser message
        reason:  String,
        /// Raw content as returned by the model
        content: String,
    },

    /// Parsed model JSON matches none of the known table shapes
    #[error(
        "Invalid table data structure. Expected 'columns' and 'rows' fields or a normalizable \
         format."
    )]
    InvalidTableStructure,
}

impl ServiceError {
    /// Returns the category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            ServiceError::MissingApiKey | ServiceError::InvalidConfig { .. } => {
                ErrorCategory::Configuration
            }
            ServiceError::ImageNotFound { .. } => ErrorCategory::NotFound,
            ServiceError::SenderUnreachable { .. }
            | ServiceError::SenderStatus { .. }
            | ServiceError::ModelRequest { .. } => ErrorCategory::Transport,
            ServiceError::InvalidBase64 { .. } => ErrorCategory::Decode,
            ServiceError::Io(_) => ErrorCategory::Io,
            ServiceError::InvalidSenderResponse { .. }
            | ServiceError::EmptyModelResponse
            | ServiceError::ModelResponseParse { .. }
            | ServiceError::InvalidTableStructure => ErrorCategory::UpstreamFormat,
        }
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use snaptable_core::error::ServiceError;
    ///
    /// let hint = ServiceError::MissingApiKey.remediation_hint();
    /// assert!(hint.contains("OPENAI_API_KEY"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            ServiceError::MissingApiKey => {
                "Set OPENAI_API_KEY in the environment or in a .env file next to the receiver \
                 and restart it."
            }
            ServiceError::InvalidConfig { .. } => {
                "Fix the named environment variable. Numeric settings must be plain integers."
            }
            ServiceError::ImageNotFound { .. } => {
                "The working image disappeared before extraction. Check that TEMP_DIR is \
                 writable and not cleaned by another process."
            }
            ServiceError::SenderUnreachable { .. } => {
                "Make sure the sender is running and that SENDER_IP and SENDER_PORT point at it. \
                 Check firewalls between the two machines."
            }
            ServiceError::SenderStatus { status } => match status {
                404 => "The sender does not expose /capture. Check SENDER_PORT.",
                _ => "The sender failed to capture its display. Check the sender log.",
            },
            ServiceError::InvalidSenderResponse { .. } => {
                "SENDER_IP and SENDER_PORT may point at a different service."
            }
            ServiceError::InvalidBase64 { .. } => {
                "Send the image as standard base64, optionally prefixed with a data URI header."
            }
            ServiceError::Io(_) => {
                "An I/O error occurred. Check directory permissions and free disk space."
            }
            ServiceError::ModelRequest { .. } => {
                "Check network access to the model endpoint, the API key and OPENAI_MODEL."
            }
            ServiceError::EmptyModelResponse
            | ServiceError::ModelResponseParse { .. }
            | ServiceError::InvalidTableStructure => {
                "The model reply was not a usable table. Crop the table more tightly and retry, \
                 or try a different OPENAI_MODEL."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message() {
        let error = ServiceError::MissingApiKey;
        assert!(error.to_string().contains("OpenAI API key is not configured"));
        assert_eq!(error.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_image_not_found_message() {
        let error = ServiceError::ImageNotFound {
            path: PathBuf::from("data/temp/missing.png"),
        };
        assert_eq!(error.to_string(), "Image file not found: data/temp/missing.png");
        assert_eq!(error.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn test_sender_status_message() {
        let error = ServiceError::SenderStatus { status: 500 };
        assert_eq!(error.to_string(), "Failed to capture screenshot. Status code: 500");
        assert_eq!(error.category(), ErrorCategory::Transport);
    }

    #[test]
    fn test_sender_status_remediation_for_404() {
        let error = ServiceError::SenderStatus { status: 404 };
        assert!(error.remediation_hint().contains("SENDER_PORT"));
    }

    #[test]
    fn test_sender_unreachable_is_transport() {
        let error = ServiceError::SenderUnreachable {
            url:    "http://10.0.0.1:5000/capture".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(error.to_string().contains("Error connecting to sender"));
        assert!(error.to_string().contains("connection refused"));
        assert_eq!(error.category(), ErrorCategory::Transport);
    }

    #[test]
    fn test_parse_error_includes_raw_content() {
        let error = ServiceError::ModelResponseParse {
            reason:  "expected value at line 1 column 1".to_string(),
            content: "Sure! Here is your table".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("Response content: Sure! Here is your table"));
        assert_eq!(error.category(), ErrorCategory::UpstreamFormat);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: ServiceError = io_error.into();
        assert!(matches!(error, ServiceError::Io(_)));
        assert_eq!(error.category(), ErrorCategory::Io);
        assert!(error.remediation_hint().contains("permissions"));
    }

    #[test]
    fn test_decode_category() {
        let error = ServiceError::InvalidBase64 {
            reason: "Invalid byte 33, offset 0.".to_string(),
        };
        assert_eq!(error.category(), ErrorCategory::Decode);
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorCategory::UpstreamFormat).unwrap(),
            r#""upstream_format""#
        );
        assert_eq!(ErrorCategory::NotFound.to_string(), "not_found");
    }
}
