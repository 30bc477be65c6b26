//! Classifier endpoint configuration with sensible defaults.
//!
//! [`ClassifierConfig`] names the hosted inference endpoints, the request
//! timeout, and the fixed zero-shot candidate set. Leaving an endpoint unset
//! selects the offline backend for that classifier.

use crate::error::ClassifyError;
use serde::{Deserialize, Serialize};

/// Default hosted emotion model.
pub const DEFAULT_EMOTION_URL: &str =
    "https://api-inference.huggingface.co/models/j-hartmann/emotion-english-distilroberta-base";

/// Default hosted zero-shot model.
pub const DEFAULT_ZERO_SHOT_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-mnli";

/// Candidate intents offered to the zero-shot classifier.
pub const DEFAULT_CANDIDATE_LABELS: &[&str] = &[
    "advice", "bye", "greet", "insult", "joke", "random", "song", "story", "thanks",
];

/// Configuration for the external classifier services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Emotion classification endpoint. `None` disables the emotion stage.
    pub emotion_url: Option<String>,
    /// Zero-shot classification endpoint. `None` disables the zero-shot stage.
    pub zero_shot_url: Option<String>,
    /// Bearer token sent with every request, if set.
    pub api_token: Option<String>,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Candidate labels passed to the zero-shot classifier, in order.
    pub candidate_labels: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            emotion_url: Some(DEFAULT_EMOTION_URL.to_owned()),
            zero_shot_url: Some(DEFAULT_ZERO_SHOT_URL.to_owned()),
            api_token: None,
            timeout_seconds: 10,
            candidate_labels: DEFAULT_CANDIDATE_LABELS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

impl ClassifierConfig {
    /// Config with both endpoints disabled.
    pub fn offline() -> Self {
        Self {
            emotion_url: None,
            zero_shot_url: None,
            ..Default::default()
        }
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `candidate_labels` must not be empty or contain blank labels
    /// - configured endpoints must be absolute `http(s)` URLs
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.timeout_seconds == 0 {
            return Err(ClassifyError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.candidate_labels.is_empty() {
            return Err(ClassifyError::Config(
                "at least one candidate label is required".into(),
            ));
        }
        if self.candidate_labels.iter().any(|l| l.trim().is_empty()) {
            return Err(ClassifyError::Config(
                "candidate labels must not be blank".into(),
            ));
        }
        for (name, endpoint) in [
            ("emotion_url", &self.emotion_url),
            ("zero_shot_url", &self.zero_shot_url),
        ] {
            if let Some(raw) = endpoint {
                validate_endpoint(name, raw)?;
            }
        }
        Ok(())
    }
}

fn validate_endpoint(name: &str, raw: &str) -> Result<(), ClassifyError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ClassifyError::Config(format!("{name} is not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClassifyError::Config(format!(
            "{name} must use http or https, got {other}"
        ))),
    }
}
