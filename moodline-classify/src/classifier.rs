//! Trait definitions for pluggable classifier backends.
//!
//! The resolvers in `moodline` only ever see these traits, so a hosted
//! inference API, an offline stand-in, or a deterministic test double can be
//! swapped in without touching resolver logic.

use async_trait::async_trait;

use crate::error::ClassifyError;
use crate::types::{EmotionPrediction, ZeroShotRanking};

/// A text-emotion classifier returning its single top prediction.
///
/// All implementations must be `Send + Sync` so one instance can serve
/// concurrent requests.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Stable backend identifier used in logs.
    fn name(&self) -> &str;

    /// Classify `text` and return the top prediction.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the service is unreachable, times out,
    /// or answers with something that is not a prediction.
    async fn classify(&self, text: &str) -> Result<EmotionPrediction, ClassifyError>;
}

/// A zero-shot classifier ranking a fixed candidate set against the text.
#[async_trait]
pub trait ZeroShotClassifier: Send + Sync {
    /// Stable backend identifier used in logs.
    fn name(&self) -> &str;

    /// Rank `candidate_labels` against `text`, highest score first.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] on transport failure or malformed output.
    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotRanking, ClassifyError>;
}
