//! Error types for the generation client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, sending, or interpreting a request
#[derive(Error, Debug)]
pub enum Error {
    /// Required input is missing or malformed; no request was sent
    #[error("{0}")]
    ValidationError(String),

    /// The request could not be sent or no response was received
    #[error("Network error: {0}")]
    TransportError(String),

    /// The service answered with a failure status or an unusable payload
    #[error("Service error{}: {}", http_status(.status), .detail.as_deref().unwrap_or("no detail"))]
    ServiceError {
        /// HTTP status, when a response was received
        status: Option<u16>,
        /// Server-supplied `detail` string, if any
        detail: Option<String>,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A submission is already in flight on this session
    #[error("A generation request is already in progress")]
    Busy,

    /// Local I/O failure (reading attachments, saving downloads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn http_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

/// Three-way classification of a failed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caught client-side before any network call
    Validation,
    /// Request never reached the service or no response came back
    Transport,
    /// Service responded but not with a usable success payload
    Service,
}

impl Error {
    /// Classify this error for presentation in a failed result.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::ValidationError(_) | Error::Busy => FailureKind::Validation,
            Error::ServiceError { .. } => FailureKind::Service,
            Error::TransportError(_) | Error::ConfigError(_) | Error::Io(_) => {
                FailureKind::Transport
            }
        }
    }

    /// Message shown to the user: validation text and server details are
    /// surfaced verbatim, everything else collapses to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::ValidationError(msg) => msg.clone(),
            Error::ServiceError {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}
