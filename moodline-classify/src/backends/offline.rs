//! Backend used when no inference endpoint is configured.
//!
//! Every call fails with [`ClassifyError::Unavailable`], which the resolvers
//! treat like any other service failure.

use async_trait::async_trait;

use crate::classifier::{EmotionClassifier, ZeroShotClassifier};
use crate::error::ClassifyError;
use crate::types::{EmotionPrediction, ZeroShotRanking};

/// Classifier that is never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClassifier;

#[async_trait]
impl EmotionClassifier for OfflineClassifier {
    fn name(&self) -> &str {
        "offline"
    }

    async fn classify(&self, _text: &str) -> Result<EmotionPrediction, ClassifyError> {
        Err(ClassifyError::Unavailable(
            "no emotion endpoint configured".into(),
        ))
    }
}

#[async_trait]
impl ZeroShotClassifier for OfflineClassifier {
    fn name(&self) -> &str {
        "offline"
    }

    async fn classify(
        &self,
        _text: &str,
        _candidate_labels: &[String],
    ) -> Result<ZeroShotRanking, ClassifyError> {
        Err(ClassifyError::Unavailable(
            "no zero-shot endpoint configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_emotion_is_unavailable() {
        let err = EmotionClassifier::classify(&OfflineClassifier, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifyError::Unavailable(_)));
    }

    #[tokio::test]
    async fn offline_zero_shot_is_unavailable() {
        let err = ZeroShotClassifier::classify(&OfflineClassifier, "hello", &["bye".into()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("zero-shot"));
    }
}
