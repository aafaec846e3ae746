//! Error types for the Slack client.
//!
//! Every failure surfaces as a [`SlackError`]. Upload calls can fail locally
//! (validation), inside the multipart encoder, on the wire, or in the
//! provider's response envelope; each of those has its own variant so callers
//! can tell them apart.

use std::time::Duration;
use thiserror::Error;

/// Result type for Slack operations
pub type SlackResult<T> = Result<T, SlackError>;

/// Root error type for the Slack client
#[derive(Error, Debug)]
pub enum SlackError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A request argument was rejected before anything was sent
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The multipart encoder failed while producing the request body
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Network or HTTP-layer failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The service answered with `ok: false` or a non-success status
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// The response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl SlackError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "SLACK_CONFIG",
            Self::Validation(_) => "SLACK_VALIDATION",
            Self::Encoding(_) => "SLACK_ENCODING",
            Self::Transport(_) => "SLACK_TRANSPORT",
            Self::Service(_) => "SLACK_SERVICE",
            Self::Decode(_) => "SLACK_DECODE",
        }
    }

    /// Provider error message, if the service rejected the call
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Service(err) => Some(err.message.as_str()),
            _ => None,
        }
    }

    /// Get HTTP status code if applicable
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Service(err) => err.status,
            _ => None,
        }
    }

    /// Build a service error from a decoded `ok: false` envelope
    pub fn from_envelope(error: Option<&str>) -> Self {
        Self::Service(ServiceError {
            message: error.unwrap_or("unknown_error").to_string(),
            status: None,
        })
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Missing token
    #[error("API token is missing")]
    MissingToken,

    /// Invalid token format
    #[error("Invalid token format: {0}")]
    InvalidToken(String),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },
}

/// Local argument validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required argument was empty
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the missing argument
        field: &'static str,
    },
}

/// Failures raised by the upload encoder
#[derive(Error, Debug)]
pub enum EncodingError {
    /// Reading the caller's input stream failed
    #[error("failed to read upload source after {bytes_read} bytes: {source}")]
    SourceRead {
        /// Bytes copied into the body before the failure
        bytes_read: u64,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing a part into the request body failed
    #[error("failed to write multipart part '{part}': {source}")]
    PartWrite {
        /// Form field name of the part
        part: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The request body was dropped before the encoder finished
    #[error("request body closed by the transport: {0}")]
    BodyClosed(#[source] std::io::Error),

    /// The encoder was stopped because the transport had already finished
    #[error("encoder stopped after the transport finished")]
    Cancelled,

    /// The encoder stopped without reporting an outcome
    #[error("encoder terminated without reporting a result")]
    Aborted,
}

impl EncodingError {
    /// Whether the failure was caused only by the consumer hanging up
    pub fn is_body_closed(&self) -> bool {
        matches!(self, Self::BodyClosed(_) | Self::Cancelled)
    }
}

/// Network errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failed
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl TransportError {
    /// Map a reqwest error, using `timeout` as the reported limit
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(timeout)
        } else if err.is_connect() {
            TransportError::ConnectionFailed {
                message: err.to_string(),
            }
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

/// Error reported by the service
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ServiceError {
    /// Provider error code, e.g. `not_authed`
    pub message: String,
    /// HTTP status when the failure came from a non-success status
    pub status: Option<u16>,
}

/// Response decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// JSON deserialization error
    #[error("Deserialization error: {message}")]
    Json {
        /// Error message
        message: String,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(err: serde_json::Error) -> Self {
        SlackError::Decode(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_envelope() {
        let err = SlackError::from_envelope(Some("not_authed"));
        assert_eq!(err.service_message(), Some("not_authed"));
        assert_eq!(err.error_code(), "SLACK_SERVICE");
        assert_eq!(err.http_status(), None);

        let err = SlackError::from_envelope(None);
        assert_eq!(err.service_message(), Some("unknown_error"));
    }

    #[test]
    fn test_body_closed_classification() {
        let closed = EncodingError::BodyClosed(std::io::ErrorKind::BrokenPipe.into());
        assert!(closed.is_body_closed());

        let read = EncodingError::SourceRead {
            bytes_read: 4,
            source: std::io::Error::other("disk gone"),
        };
        assert!(!read.is_body_closed());
        assert!(EncodingError::Cancelled.is_body_closed());
        assert!(!EncodingError::Aborted.is_body_closed());
        assert!(read.to_string().contains("after 4 bytes"));
    }

    #[test]
    fn test_validation_message() {
        let err: SlackError = ValidationError::MissingField { field: "filename" }.into();
        assert_eq!(err.to_string(), "Validation error: filename must not be empty");
        assert_eq!(err.error_code(), "SLACK_VALIDATION");
    }

    #[test]
    fn test_decode_from_serde() {
        let err: SlackError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, SlackError::Decode(DecodeError::Json { .. })));
    }
}
