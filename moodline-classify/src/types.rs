//! Prediction types returned by the classifier backends.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The single top prediction of a text-emotion classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPrediction {
    /// Raw label as emitted by the model (e.g. `sadness`).
    pub label: String,
    /// Model confidence in `0.0..=1.0`.
    pub confidence: f32,
}

impl EmotionPrediction {
    /// Create a prediction.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// One scored candidate in a zero-shot ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroShotScore {
    /// The candidate label.
    pub label: String,
    /// Entailment score in `0.0..=1.0`.
    pub score: f32,
}

/// Candidate labels ranked by score, highest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZeroShotRanking {
    entries: Vec<ZeroShotScore>,
}

impl ZeroShotRanking {
    /// Build a ranking from unordered scores. Sorting is stable, so ties keep
    /// the order the service reported them in.
    pub fn new(mut entries: Vec<ZeroShotScore>) -> Self {
        entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Self { entries }
    }

    /// The highest scoring candidate, if any.
    pub fn top(&self) -> Option<&ZeroShotScore> {
        self.entries.first()
    }

    /// All candidates, highest score first.
    pub fn entries(&self) -> &[ZeroShotScore] {
        &self.entries
    }

    /// Number of ranked candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the ranking holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f32)> for ZeroShotRanking {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(label, score)| ZeroShotScore { label, score })
                .collect(),
        )
    }
}
