//! Error types for the moodline-classify crate.
//!
//! Every variant is distinguishable so callers can tell a slow service from
//! a broken one. No API tokens appear in error messages.

/// Errors that can occur while calling an external classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The HTTP request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The classifier did not answer within the configured timeout.
    #[error("classifier timed out: {0}")]
    Timeout(String),

    /// The service answered with a non-success status code.
    #[error("classifier returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response body could not be interpreted as a prediction.
    #[error("malformed classifier response: {0}")]
    Parse(String),

    /// Invalid classifier configuration.
    #[error("config error: {0}")]
    Config(String),

    /// No backend is configured for this classifier.
    #[error("classifier unavailable: {0}")]
    Unavailable(String),
}

impl ClassifyError {
    /// Returns `true` for failures that might succeed on a later request
    /// (network, timeout, 429 and 5xx responses).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Parse(_) | Self::Config(_) | Self::Unavailable(_) => false,
        }
    }
}

/// Convenience type alias for moodline-classify results.
pub type Result<T> = std::result::Result<T, ClassifyError>;
