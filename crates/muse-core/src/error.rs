//! Error types for the muse content-safety pipeline.

use thiserror::Error;

/// Result type alias using muse's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for muse operations.
///
/// Remote clients resolve these internally per their fail-open/fail-closed
/// policy; errors never propagate out of `filter_batch`.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text moderation call failed
    #[error("Moderation error: {0}")]
    Moderation(String),

    /// Image classification call failed
    #[error("Image safety error: {0}")]
    ImageSafety(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Remote endpoint returned a non-success status
    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether a retry-with-backoff attempt may succeed.
    ///
    /// Retryable: transport failures (timeout, connection), HTTP 429, 5xx.
    /// Terminal: 4xx other than 429, serialization, configuration.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Request(_) => true,
            Error::UpstreamStatus { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
