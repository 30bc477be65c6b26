//! Confidence-gated emotion stage.

use std::sync::Arc;
use std::time::Duration;

use moodline_classify::EmotionClassifier;
use tracing::{debug, warn};

use super::call_with_timeout;
use crate::taxonomy::{CanonicalLabel, ClusterTable};

/// Resolves text through the external emotion classifier.
///
/// A prediction is accepted only when its confidence is strictly above the
/// threshold. Accepted raw labels missing from the cluster table resolve to
/// the default label.
#[derive(Clone)]
pub struct EmotionResolver {
    classifier: Arc<dyn EmotionClassifier>,
    clusters: Arc<ClusterTable>,
    threshold: f32,
    default_label: CanonicalLabel,
    timeout: Duration,
}

impl EmotionResolver {
    /// Create a resolver.
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        clusters: Arc<ClusterTable>,
        threshold: f32,
        default_label: CanonicalLabel,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            clusters,
            threshold,
            default_label,
            timeout,
        }
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Classify `text` once and return a canonical label, or `None` when the
    /// call fails or the prediction is not confident enough.
    pub async fn resolve(&self, text: &str) -> Option<CanonicalLabel> {
        let prediction = match call_with_timeout(self.timeout, self.classifier.classify(text)).await
        {
            Ok(prediction) => prediction,
            Err(err) => {
                warn!(
                    classifier = self.classifier.name(),
                    error = %err,
                    transient = err.is_transient(),
                    "emotion classification failed"
                );
                return None;
            }
        };

        // NaN never compares greater, so it is rejected here as well.
        let accepted = prediction.confidence > self.threshold;
        if !accepted {
            debug!(
                label = %prediction.label,
                confidence = prediction.confidence,
                threshold = self.threshold,
                "emotion prediction below threshold"
            );
            return None;
        }

        let label = match self.clusters.lookup(&prediction.label) {
            Some(label) => label.clone(),
            None => {
                debug!(
                    raw = %prediction.label,
                    default = %self.default_label,
                    "emotion label not in cluster table"
                );
                self.default_label.clone()
            }
        };
        debug!(raw = %prediction.label, %label, confidence = prediction.confidence, "emotion accepted");
        Some(label)
    }
}
