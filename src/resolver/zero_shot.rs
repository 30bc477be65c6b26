//! Terminal zero-shot stage. Always produces a label.

use std::sync::Arc;
use std::time::Duration;

use moodline_classify::ZeroShotClassifier;
use tracing::{debug, warn};

use super::call_with_timeout;
use crate::taxonomy::{CanonicalLabel, ClusterTable};

/// Resolves text by ranking a fixed candidate set with the zero-shot
/// classifier and mapping the top candidate through the cluster table.
#[derive(Clone)]
pub struct ZeroShotResolver {
    classifier: Arc<dyn ZeroShotClassifier>,
    clusters: Arc<ClusterTable>,
    candidate_labels: Vec<String>,
    default_label: CanonicalLabel,
    timeout: Duration,
}

impl ZeroShotResolver {
    /// Create a resolver.
    pub fn new(
        classifier: Arc<dyn ZeroShotClassifier>,
        clusters: Arc<ClusterTable>,
        candidate_labels: Vec<String>,
        default_label: CanonicalLabel,
        timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            clusters,
            candidate_labels,
            default_label,
            timeout,
        }
    }

    /// Candidate labels offered to the classifier, in order.
    pub fn candidate_labels(&self) -> &[String] {
        &self.candidate_labels
    }

    /// Classify `text` once. Failures, empty rankings, and unmapped top
    /// candidates all yield the default label.
    pub async fn resolve(&self, text: &str) -> CanonicalLabel {
        let ranking = match call_with_timeout(
            self.timeout,
            self.classifier.classify(text, &self.candidate_labels),
        )
        .await
        {
            Ok(ranking) => ranking,
            Err(err) => {
                warn!(
                    classifier = self.classifier.name(),
                    error = %err,
                    transient = err.is_transient(),
                    default = %self.default_label,
                    "zero-shot classification failed"
                );
                return self.default_label.clone();
            }
        };

        let Some(top) = ranking.top() else {
            warn!(default = %self.default_label, "zero-shot ranking was empty");
            return self.default_label.clone();
        };

        match self.clusters.lookup(&top.label) {
            Some(label) => {
                debug!(raw = %top.label, %label, score = top.score, "zero-shot accepted");
                label.clone()
            }
            None => {
                debug!(
                    raw = %top.label,
                    default = %self.default_label,
                    "zero-shot label not in cluster table"
                );
                self.default_label.clone()
            }
        }
    }
}
