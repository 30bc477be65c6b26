//! Hosted inference API backends.
//!
//! Both classifiers speak the JSON shape used by hosted transformer
//! pipelines:
//!
//! - text classification: `POST {"inputs": text}` answering
//!   `[{"label", "score"}, ...]` or the batched `[[{"label", "score"}, ...]]`
//! - zero-shot: `POST {"inputs": text, "parameters": {"candidate_labels": [...]}}`
//!   answering `{"sequence", "labels": [...], "scores": [...]}`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::classifier::{EmotionClassifier, ZeroShotClassifier};
use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use crate::http::{build_client, extract_error_message, map_transport_error};
use crate::types::{EmotionPrediction, ZeroShotRanking, ZeroShotScore};

// ── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationPayload {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct ZeroShotBody {
    labels: Vec<String>,
    scores: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ZeroShotPayload {
    Single(ZeroShotBody),
    Batched(Vec<ZeroShotBody>),
}

// ── Shared request plumbing ─────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Endpoint {
    client: reqwest::Client,
    url: String,
    api_token: Option<String>,
}

impl Endpoint {
    fn new(url: impl Into<String>, config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            client: build_client(config)?,
            url: url.into(),
            api_token: config.api_token.clone(),
        })
    }

    async fn post(&self, body: &serde_json::Value) -> Result<String, ClassifyError> {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(ClassifyError::Status {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }
        Ok(text)
    }
}

fn check_score(label: &str, score: f32) -> Result<(), ClassifyError> {
    if score.is_finite() && (0.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(ClassifyError::Parse(format!(
            "score {score} for label {label:?} is outside 0..=1"
        )))
    }
}

/// Parse a text-classification body and return its top prediction.
pub fn parse_emotion_response(body: &str) -> Result<EmotionPrediction, ClassifyError> {
    let payload: ClassificationPayload =
        serde_json::from_str(body).map_err(|e| ClassifyError::Parse(e.to_string()))?;

    let scores = match payload {
        ClassificationPayload::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
        ClassificationPayload::Flat(scores) => scores,
    };

    let mut best: Option<LabelScore> = None;
    for entry in scores {
        check_score(&entry.label, entry.score)?;
        if best.as_ref().is_none_or(|b| entry.score > b.score) {
            best = Some(entry);
        }
    }

    best.map(|b| EmotionPrediction::new(b.label, b.score))
        .ok_or_else(|| ClassifyError::Parse("empty prediction list".into()))
}

/// Parse a zero-shot body into a descending ranking.
pub fn parse_zero_shot_response(body: &str) -> Result<ZeroShotRanking, ClassifyError> {
    let payload: ZeroShotPayload =
        serde_json::from_str(body).map_err(|e| ClassifyError::Parse(e.to_string()))?;

    let body = match payload {
        ZeroShotPayload::Single(body) => body,
        ZeroShotPayload::Batched(bodies) => bodies
            .into_iter()
            .next()
            .ok_or_else(|| ClassifyError::Parse("empty zero-shot batch".into()))?,
    };

    if body.labels.len() != body.scores.len() {
        return Err(ClassifyError::Parse(format!(
            "{} labels but {} scores",
            body.labels.len(),
            body.scores.len()
        )));
    }
    if body.labels.is_empty() {
        return Err(ClassifyError::Parse("empty zero-shot ranking".into()));
    }

    let mut entries = Vec::with_capacity(body.labels.len());
    for (label, score) in body.labels.into_iter().zip(body.scores) {
        check_score(&label, score)?;
        entries.push(ZeroShotScore { label, score });
    }
    Ok(ZeroShotRanking::new(entries))
}

// ── Emotion backend ─────────────────────────────────────────────────────

/// Emotion classifier backed by a hosted text-classification endpoint.
#[derive(Debug, Clone)]
pub struct InferenceApiEmotion {
    endpoint: Endpoint,
}

impl InferenceApiEmotion {
    /// Create a backend posting to `url` with the timeout and token from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            endpoint: Endpoint::new(url, config)?,
        })
    }

    /// The endpoint this backend posts to.
    pub fn url(&self) -> &str {
        &self.endpoint.url
    }
}

#[async_trait]
impl EmotionClassifier for InferenceApiEmotion {
    fn name(&self) -> &str {
        "inference-api-emotion"
    }

    async fn classify(&self, text: &str) -> Result<EmotionPrediction, ClassifyError> {
        tracing::trace!(text, "emotion request");
        let body = self.endpoint.post(&json!({ "inputs": text })).await?;
        let prediction = parse_emotion_response(&body)?;
        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.confidence,
            "emotion prediction"
        );
        Ok(prediction)
    }
}

// ── Zero-shot backend ───────────────────────────────────────────────────

/// Zero-shot classifier backed by a hosted NLI endpoint.
#[derive(Debug, Clone)]
pub struct InferenceApiZeroShot {
    endpoint: Endpoint,
}

impl InferenceApiZeroShot {
    /// Create a backend posting to `url` with the timeout and token from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::Http`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        Ok(Self {
            endpoint: Endpoint::new(url, config)?,
        })
    }

    /// The endpoint this backend posts to.
    pub fn url(&self) -> &str {
        &self.endpoint.url
    }
}

#[async_trait]
impl ZeroShotClassifier for InferenceApiZeroShot {
    fn name(&self) -> &str {
        "inference-api-zero-shot"
    }

    async fn classify(
        &self,
        text: &str,
        candidate_labels: &[String],
    ) -> Result<ZeroShotRanking, ClassifyError> {
        tracing::trace!(text, candidates = candidate_labels.len(), "zero-shot request");
        let request = json!({
            "inputs": text,
            "parameters": { "candidate_labels": candidate_labels },
        });
        let body = self.endpoint.post(&request).await?;
        let ranking = parse_zero_shot_response(&body)?;
        if let Some(top) = ranking.top() {
            tracing::debug!(label = %top.label, score = top.score, "zero-shot top candidate");
        }
        Ok(ranking)
    }
}
