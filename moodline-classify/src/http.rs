//! Shared HTTP client for inference endpoint requests.

use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use std::time::Duration;

/// User-Agent sent to inference endpoints.
pub const USER_AGENT: &str = concat!("moodline-classify/", env!("CARGO_PKG_VERSION"));

/// Build a [`reqwest::Client`] configured for inference requests.
///
/// The client carries the configured timeout so a hung service surfaces as
/// [`ClassifyError::Timeout`] instead of blocking the pipeline.
///
/// # Errors
///
/// Returns [`ClassifyError::Http`] if the client cannot be constructed.
pub fn build_client(config: &ClassifierConfig) -> Result<reqwest::Client, ClassifyError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ClassifyError::Http(format!("failed to build HTTP client: {e}")))
}

/// Map a transport error to the matching [`ClassifyError`] variant.
pub fn map_transport_error(err: reqwest::Error) -> ClassifyError {
    if err.is_timeout() {
        ClassifyError::Timeout(err.to_string())
    } else if err.is_decode() {
        ClassifyError::Parse(err.to_string())
    } else {
        ClassifyError::Http(err.to_string())
    }
}

/// Extract a human-readable message from an inference API error body.
///
/// Hosted endpoints answer `{"error": "..."}`; anything else is returned
/// verbatim.
pub fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
