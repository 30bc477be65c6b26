//! Text in, persona reply out.
//!
//! [`ReplyEngine`] composes the label pipeline with the response selector.
//! It is the only type the HTTP layer talks to.

use serde::Serialize;
use tracing::{info, trace};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::pipeline::{LabelPipeline, ResolutionStage};
use crate::selector::{ResponseSelector, SelectionTier};

/// Texts run by [`ReplyEngine::self_test`].
pub const PROBE_TEXTS: &[&str] = &[
    "hello",
    "im sad",
    "im happy",
    "im angry",
    "im scared",
    "im in love",
    "tell me a story",
];

/// A complete reply to one input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    /// The input text, unchanged.
    pub input: String,
    /// Canonical label produced by the pipeline.
    pub predicted_label: String,
    /// Dataset label the response was drawn from.
    pub emotion: String,
    /// Persona name.
    pub celebrity: String,
    /// Persona portrait, possibly a generated avatar.
    pub image_url: String,
    /// Dialogue line shown to the user.
    pub dialogue_text: String,
    /// Audio clip of the dialogue.
    pub audio_url: String,
    /// Failure caught while resolving the label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One row of [`ReplyEngine::self_test`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// Fixed probe text.
    pub text: String,
    /// Canonical label the pipeline produced for it.
    pub predicted_emotion: String,
    /// Persona that answered.
    pub celebrity: String,
    /// Dialogue line of the chosen response.
    pub dialogue_text: String,
}

/// Resolves labels and picks persona responses.
#[derive(Clone)]
pub struct ReplyEngine {
    pipeline: LabelPipeline,
    selector: ResponseSelector,
    catalog: Catalog,
}

impl ReplyEngine {
    /// Create an engine. `catalog` is served as-is by the diagnostics route.
    pub fn new(pipeline: LabelPipeline, selector: ResponseSelector, catalog: Catalog) -> Self {
        Self {
            pipeline,
            selector,
            catalog,
        }
    }

    /// The label pipeline.
    pub fn pipeline(&self) -> &LabelPipeline {
        &self.pipeline
    }

    /// The response selector.
    pub fn selector(&self) -> &ResponseSelector {
        &self.selector
    }

    /// Taxonomy and dataset summary.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Resolve `text` and pick a response. Never fails.
    pub async fn reply(&self, text: &str) -> Reply {
        let request_id = Uuid::new_v4();
        trace!(%request_id, text, "reply requested");

        let resolution = self.pipeline.resolve(text).await;
        let selection = self.selector.select(resolution.label.as_str());

        if resolution.stage != ResolutionStage::Keyword
            || selection.tier != SelectionTier::Exact
        {
            info!(
                %request_id,
                label = %resolution.label,
                stage = ?resolution.stage,
                used = %selection.label,
                tier = ?selection.tier,
                persona = %selection.persona,
                "reply selected"
            );
        }

        Reply {
            input: text.to_owned(),
            predicted_label: resolution.label.to_string(),
            emotion: selection.label,
            celebrity: selection.persona,
            image_url: selection.artifact.image,
            dialogue_text: selection.artifact.text,
            audio_url: selection.artifact.audio,
            error: resolution.error,
        }
    }

    /// Run the fixed probe texts through the engine.
    pub async fn self_test(&self) -> Vec<ProbeResult> {
        let mut results = Vec::with_capacity(PROBE_TEXTS.len());
        for text in PROBE_TEXTS {
            let reply = self.reply(text).await;
            results.push(ProbeResult {
                text: reply.input,
                predicted_emotion: reply.predicted_label,
                celebrity: reply.celebrity,
                dialogue_text: reply.dialogue_text,
            });
        }
        results
    }
}
