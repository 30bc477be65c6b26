//! Error types for moodline.
//!
//! Only startup is allowed to fail: request handling degrades to default
//! labels and built-in responses instead of returning these errors.

use moodline_classify::ClassifyError;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum MoodError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Conflicting or unknown labels in the taxonomy, cluster table, or keyword rules.
    #[error("taxonomy error: {0}")]
    Taxonomy(String),

    /// The response dataset is malformed.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Classifier backend construction failed.
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifyError),

    /// HTTP server error (bind, serve).
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MoodError>;
