//! Error types for the backend client

use crate::wire::VerdictPayload;
use thiserror::Error;

/// Result type for backend calls
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors that can occur when talking to the verification backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The request never produced a response (connection refused, DNS, TLS, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The backend answered with a non-success status
    #[error("Backend error (status {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        /// HTTP status code
        status: u16,
        /// `error` or `message` text from a JSON error body, if any
        message: Option<String>,
        /// The error body itself, when it was a JSON object
        ///
        /// A failed scan may still carry the OCR output it got that far with.
        body: Option<Box<VerdictPayload>>,
    },

    /// The success body was not a verdict
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The client could not be built from its configuration
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl LookupError {
    /// Error text supplied by the backend itself, if it sent one
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    /// JSON error body supplied by the backend, if it sent one
    #[must_use]
    pub fn backend_body(&self) -> Option<&VerdictPayload> {
        match self {
            Self::Status {
                body: Some(body), ..
            } => Some(body),
            _ => None,
        }
    }
}
