//! Response selection with tiered fallback.
//!
//! Every label yields an artifact:
//!
//! 1. **Exact**: the label is in the dataset; pick a persona at random.
//! 2. **Similar**: dataset labels where either string contains the other;
//!    pick one of those labels, then a persona.
//! 3. **DefaultLabel**: the configured default dataset label.
//! 4. **BuiltIn**: a fixed artifact compiled into the binary.

use std::sync::Arc;

use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};
use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{ResponseArtifact, ResponseDataset};

/// Persona used when the dataset cannot answer at all.
pub const BUILTIN_PERSONA: &str = "georgesar";
/// Dialogue line of the built-in artifact.
pub const BUILTIN_TEXT: &str = "helloooo";
/// Audio clip of the built-in artifact.
pub const BUILTIN_AUDIO: &str =
    "https://drive.google.com/uc?export=download&id=1wwRDYJIKtO9QMDuw7lmYD6gHqYjlwBw3";

/// Which fallback tier produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
    /// The resolved label has responses.
    Exact,
    /// A dataset label containing, or contained in, the resolved label.
    Similar,
    /// The configured dataset default label.
    DefaultLabel,
    /// The hard-coded persona; the dataset could not answer.
    BuiltIn,
}

/// A chosen persona and artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    /// Dataset label the artifact came from.
    pub label: String,
    /// Persona name.
    pub persona: String,
    /// The response artifact.
    pub artifact: ResponseArtifact,
    /// Fallback tier that produced it.
    pub tier: SelectionTier,
}

impl Selection {
    fn builtin(default_label: &str) -> Self {
        Self {
            label: default_label.to_owned(),
            persona: BUILTIN_PERSONA.to_owned(),
            artifact: ResponseArtifact {
                image: String::new(),
                text: BUILTIN_TEXT.to_owned(),
                audio: BUILTIN_AUDIO.to_owned(),
            },
            tier: SelectionTier::BuiltIn,
        }
    }
}

/// Picks a persona response for a resolved label.
#[derive(Debug, Clone)]
pub struct ResponseSelector {
    dataset: Arc<ResponseDataset>,
    default_label: String,
}

impl ResponseSelector {
    /// Create a selector over `dataset` with `default_label` as the third tier.
    pub fn new(dataset: Arc<ResponseDataset>, default_label: impl Into<String>) -> Self {
        Self {
            dataset,
            default_label: default_label.into(),
        }
    }

    /// The dataset being selected from.
    pub fn dataset(&self) -> &ResponseDataset {
        &self.dataset
    }

    /// The dataset label used by the third tier.
    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Select a response for `label` using the thread-local RNG.
    pub fn select(&self, label: &str) -> Selection {
        self.select_with(label, &mut rand::thread_rng())
    }

    /// Select a response for `label` using `rng`. Never fails.
    pub fn select_with<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> Selection {
        if let Some(selection) = self.pick_persona(label, SelectionTier::Exact, rng) {
            debug!(label, persona = %selection.persona, "exact response");
            return selection;
        }

        let similar: Vec<&str> = self
            .dataset
            .labels()
            .filter(|candidate| candidate.contains(label) || label.contains(candidate))
            .collect();
        if let Some(&candidate) = similar.choose(rng) {
            if let Some(selection) = self.pick_persona(candidate, SelectionTier::Similar, rng) {
                warn!(label, used = candidate, "no exact response; using similar label");
                return selection;
            }
        }

        if let Some(selection) =
            self.pick_persona(&self.default_label, SelectionTier::DefaultLabel, rng)
        {
            warn!(label, used = %self.default_label, "no similar response; using default label");
            return selection;
        }

        warn!(label, "dataset has no default response; using built-in persona");
        Selection::builtin(&self.default_label)
    }

    fn pick_persona<R: Rng + ?Sized>(
        &self,
        label: &str,
        tier: SelectionTier,
        rng: &mut R,
    ) -> Option<Selection> {
        let (persona, artifact) = self.dataset.personas(label)?.iter().choose(rng)?;
        Some(Selection {
            label: label.to_owned(),
            persona: persona.clone(),
            artifact: artifact.clone(),
            tier,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn dataset(json: &str) -> Arc<ResponseDataset> {
        Arc::new(ResponseDataset::from_json_str(json).unwrap())
    }

    fn sample() -> Arc<ResponseDataset> {
        dataset(
            r#"{
                "greeting": {
                    "georgesar": {"text": "helloooo", "audio": "https://a/g1"},
                    "rimitomi": {"text": "hey there", "audio": "https://a/g2"}
                },
                "sad": {"dileep": {"text": "it's okay", "audio": "https://a/s1"}},
                "frustrated": {"suraj": {"text": "enthu", "audio": "https://a/f1"}}
            }"#,
        )
    }

    #[test]
    fn exact_label_uses_exact_tier() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let selection = selector.select_with("sad", &mut StdRng::seed_from_u64(1));
        assert_eq!(selection.tier, SelectionTier::Exact);
        assert_eq!(selection.label, "sad");
        assert_eq!(selection.persona, "dileep");
        assert_eq!(selection.artifact.text, "it's okay");
    }

    #[test]
    fn exact_tier_eventually_picks_every_persona() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let mut rng = StdRng::seed_from_u64(7);
        let seen: HashSet<String> = (0..64)
            .map(|_| selector.select_with("greeting", &mut rng).persona)
            .collect();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn same_seed_gives_same_choice() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let a = selector.select_with("greeting", &mut StdRng::seed_from_u64(42));
        let b = selector.select_with("greeting", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn contained_label_uses_similar_tier() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let selection = selector.select_with("frustrate", &mut StdRng::seed_from_u64(3));
        assert_eq!(selection.tier, SelectionTier::Similar);
        assert_eq!(selection.label, "frustrated");
    }

    #[test]
    fn containing_label_uses_similar_tier() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let selection = selector.select_with("very sad indeed", &mut StdRng::seed_from_u64(3));
        assert_eq!(selection.tier, SelectionTier::Similar);
        assert_eq!(selection.label, "sad");
    }

    #[test]
    fn unknown_label_uses_default_tier() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let selection = selector.select_with("thanks", &mut StdRng::seed_from_u64(3));
        assert_eq!(selection.tier, SelectionTier::DefaultLabel);
        assert_eq!(selection.label, "greeting");
    }

    #[test]
    fn empty_dataset_uses_builtin_persona() {
        let selector = ResponseSelector::new(Arc::new(ResponseDataset::empty()), "greeting");
        let selection = selector.select("sad");
        assert_eq!(selection.tier, SelectionTier::BuiltIn);
        assert_eq!(selection.persona, BUILTIN_PERSONA);
        assert_eq!(selection.artifact.text, BUILTIN_TEXT);
        assert_eq!(selection.artifact.audio, BUILTIN_AUDIO);
        assert_eq!(selection.label, "greeting");
    }

    #[test]
    fn missing_default_label_uses_builtin_persona() {
        let selector = ResponseSelector::new(sample(), "nonexistent");
        let selection = selector.select("thanks");
        assert_eq!(selection.tier, SelectionTier::BuiltIn);
    }

    #[test]
    fn empty_label_is_similar_to_every_dataset_label() {
        let selector = ResponseSelector::new(sample(), "greeting");
        let selection = selector.select_with("", &mut StdRng::seed_from_u64(9));
        assert_eq!(selection.tier, SelectionTier::Similar);
    }

    #[test]
    fn tier_serializes_in_snake_case() {
        assert_eq!(
            serde_json::to_value(SelectionTier::DefaultLabel).unwrap(),
            "default_label"
        );
    }
}
