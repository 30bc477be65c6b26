//! The hybrid label-resolution pipeline.
//!
//! ```text
//! keywords ──hit──► done
//!    │ miss
//! emotion ───hit──► done
//!    │ miss
//! zero-shot ──────► done   (always terminates)
//! ```
//!
//! Stages run strictly in order within one request and are never retried.
//! The orchestrator's contract is total: a panic inside any stage is caught
//! at this boundary and replaced by the default label.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::Serialize;
use tracing::{debug, error};

use crate::keywords::KeywordRuleEngine;
use crate::resolver::{EmotionResolver, ZeroShotResolver};
use crate::taxonomy::CanonicalLabel;

/// Which stage produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStage {
    /// A keyword rule fired.
    Keyword,
    /// The emotion classifier was confident enough.
    Emotion,
    /// The zero-shot classifier decided (including its own default).
    ZeroShot,
    /// A stage failed unexpectedly and the orchestrator substituted the default.
    Default,
}

/// The outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// The resolved canonical label.
    pub label: CanonicalLabel,
    /// The stage that produced it.
    pub stage: ResolutionStage,
    /// Failure caught at the orchestrator boundary, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs the keyword, emotion, and zero-shot stages in fixed precedence.
#[derive(Clone)]
pub struct LabelPipeline {
    keywords: Arc<KeywordRuleEngine>,
    emotion: EmotionResolver,
    zero_shot: ZeroShotResolver,
    default_label: CanonicalLabel,
}

impl LabelPipeline {
    /// Assemble a pipeline from its stages.
    pub fn new(
        keywords: Arc<KeywordRuleEngine>,
        emotion: EmotionResolver,
        zero_shot: ZeroShotResolver,
        default_label: CanonicalLabel,
    ) -> Self {
        Self {
            keywords,
            emotion,
            zero_shot,
            default_label,
        }
    }

    /// The label returned when a stage fails unexpectedly.
    pub fn default_label(&self) -> &CanonicalLabel {
        &self.default_label
    }

    /// Resolve `text` to exactly one canonical label. Never fails.
    pub async fn resolve(&self, text: &str) -> Resolution {
        match AssertUnwindSafe(self.run_stages(text)).catch_unwind().await {
            Ok((label, stage)) => {
                debug!(%label, ?stage, "label resolved");
                Resolution {
                    label,
                    stage,
                    error: None,
                }
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    error = %message,
                    default = %self.default_label,
                    "label pipeline failed; using default label"
                );
                Resolution {
                    label: self.default_label.clone(),
                    stage: ResolutionStage::Default,
                    error: Some(message),
                }
            }
        }
    }

    /// Resolve `text` and return only the label.
    pub async fn resolve_label(&self, text: &str) -> CanonicalLabel {
        self.resolve(text).await.label
    }

    async fn run_stages(&self, text: &str) -> (CanonicalLabel, ResolutionStage) {
        if let Some(label) = self.keywords.match_label(text) {
            return (label.clone(), ResolutionStage::Keyword);
        }
        if let Some(label) = self.emotion.resolve(text).await {
            return (label, ResolutionStage::Emotion);
        }
        (self.zero_shot.resolve(text).await, ResolutionStage::ZeroShot)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "label pipeline panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::time::Duration;

    use moodline_classify::{
        ClassifyError, EmotionClassifier, EmotionPrediction, ZeroShotClassifier, ZeroShotRanking,
    };

    use super::*;
    use crate::resolver::testing::{PanickingEmotion, ScriptedEmotion, ScriptedZeroShot};
    use crate::taxonomy::ClusterTable;

    const THRESHOLD: f32 = 0.3;

    fn pipeline(
        emotion: Arc<dyn EmotionClassifier>,
        zero_shot: Arc<dyn ZeroShotClassifier>,
    ) -> LabelPipeline {
        let clusters = Arc::new(ClusterTable::builtin().unwrap());
        let keywords = Arc::new(KeywordRuleEngine::builtin(&clusters).unwrap());
        let default = clusters.canonical("greeting").unwrap().clone();
        let timeout = Duration::from_secs(1);
        LabelPipeline::new(
            keywords,
            EmotionResolver::new(emotion, clusters.clone(), THRESHOLD, default.clone(), timeout),
            ZeroShotResolver::new(
                zero_shot,
                clusters,
                vec!["advice".into(), "bye".into(), "story".into()],
                default.clone(),
                timeout,
            ),
            default,
        )
    }

    fn unavailable() -> ClassifyError {
        ClassifyError::Unavailable("down for test".into())
    }

    fn top(label: &str) -> ZeroShotRanking {
        [(label.to_owned(), 0.9)].into_iter().collect()
    }

    #[tokio::test]
    async fn keyword_hit_short_circuits_classifiers() {
        let emotion = Arc::new(ScriptedEmotion::ok(EmotionPrediction::new("anger", 0.99)));
        let zero_shot = Arc::new(ScriptedZeroShot::ok(top("advice")));
        let pipeline = pipeline(emotion.clone(), zero_shot.clone());

        let resolution = pipeline.resolve("hello").await;
        assert_eq!(resolution.label, "greeting");
        assert_eq!(resolution.stage, ResolutionStage::Keyword);
        assert_eq!(emotion.calls(), 0);
        assert_eq!(zero_shot.calls(), 0);
    }

    #[tokio::test]
    async fn confident_emotion_skips_zero_shot() {
        let emotion = Arc::new(ScriptedEmotion::ok(EmotionPrediction::new("fear", 0.7)));
        let zero_shot = Arc::new(ScriptedZeroShot::ok(top("advice")));
        let pipeline = pipeline(emotion, zero_shot.clone());

        let resolution = pipeline.resolve("xyzzy plugh").await;
        assert_eq!(resolution.label, "scared");
        assert_eq!(resolution.stage, ResolutionStage::Emotion);
        assert_eq!(zero_shot.calls(), 0);
    }

    #[tokio::test]
    async fn low_confidence_falls_through_to_zero_shot() {
        let emotion = Arc::new(ScriptedEmotion::ok(EmotionPrediction::new("joy", 0.1)));
        let zero_shot = Arc::new(ScriptedZeroShot::ok(top("advice")));
        let resolution = pipeline(emotion, zero_shot).resolve("xyzzy plugh").await;
        assert_eq!(resolution.label, "advice");
        assert_eq!(resolution.stage, ResolutionStage::ZeroShot);
    }

    #[tokio::test]
    async fn both_services_failing_yields_default() {
        let emotion = Arc::new(ScriptedEmotion::err(unavailable));
        let zero_shot = Arc::new(ScriptedZeroShot::err(unavailable));
        let resolution = pipeline(emotion, zero_shot).resolve("xyzzy plugh").await;
        assert_eq!(resolution.label, "greeting");
        assert_eq!(resolution.stage, ResolutionStage::ZeroShot);
        assert!(resolution.error.is_none());
    }

    #[tokio::test]
    async fn panicking_stage_is_caught_at_boundary() {
        let zero_shot = Arc::new(ScriptedZeroShot::ok(top("advice")));
        let resolution = pipeline(Arc::new(PanickingEmotion), zero_shot)
            .resolve("xyzzy plugh")
            .await;
        assert_eq!(resolution.label, "greeting");
        assert_eq!(resolution.stage, ResolutionStage::Default);
        assert_eq!(resolution.error.as_deref(), Some("classifier bug"));
    }

    #[tokio::test]
    async fn empty_and_whitespace_input_resolve() {
        let emotion = Arc::new(ScriptedEmotion::err(unavailable));
        let zero_shot = Arc::new(ScriptedZeroShot::err(unavailable));
        let pipeline = pipeline(emotion, zero_shot);
        for text in ["", "   ", "\n\t", "ñandú 🦤"] {
            assert_eq!(pipeline.resolve_label(text).await, "greeting", "input {text:?}");
        }
    }

    #[tokio::test]
    async fn identical_text_resolves_identically() {
        let emotion = Arc::new(ScriptedEmotion::ok(EmotionPrediction::new("sadness", 0.8)));
        let zero_shot = Arc::new(ScriptedZeroShot::ok(top("advice")));
        let pipeline = pipeline(emotion, zero_shot);
        let first = pipeline.resolve_label("xyzzy").await;
        for _ in 0..5 {
            assert_eq!(pipeline.resolve_label("xyzzy").await, first);
        }
    }

    #[test]
    fn resolution_serializes_stage_in_snake_case() {
        let clusters = ClusterTable::builtin().unwrap();
        let resolution = Resolution {
            label: clusters.canonical("bye").unwrap().clone(),
            stage: ResolutionStage::ZeroShot,
            error: None,
        };
        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["stage"], "zero_shot");
        assert_eq!(json["label"], "bye");
        assert!(json.get("error").is_none());
    }
}
