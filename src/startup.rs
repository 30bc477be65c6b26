//! Startup: turns a [`MoodConfig`] into a ready [`ReplyEngine`].
//!
//! Everything that may fail does so here, before the server binds: invalid
//! config, taxonomy conflicts, an unknown default label, and a malformed
//! dataset.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moodline_classify::backends::{emotion_from_config, zero_shot_from_config};
use moodline_classify::{EmotionClassifier, ZeroShotClassifier};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::{DatasetConfig, MoodConfig};
use crate::dataset::ResponseDataset;
use crate::engine::ReplyEngine;
use crate::error::{MoodError, Result};
use crate::keywords::KeywordRuleEngine;
use crate::pipeline::LabelPipeline;
use crate::resolver::{EmotionResolver, ZeroShotResolver};
use crate::selector::ResponseSelector;
use crate::taxonomy::ClusterTable;

/// Build the engine with classifier backends taken from `config.classifier`.
///
/// # Errors
///
/// Returns an error if the config is invalid, the dataset cannot be loaded,
/// or the classifier backends cannot be constructed.
pub fn initialize(config: &MoodConfig) -> Result<ReplyEngine> {
    config.validate()?;
    let emotion = emotion_from_config(&config.classifier)?;
    let zero_shot = zero_shot_from_config(&config.classifier)?;
    initialize_with(config, emotion, zero_shot)
}

/// Build the engine around the given classifiers.
///
/// # Errors
///
/// Returns an error if the config is invalid, the pipeline default label is
/// not a canonical label, or the dataset cannot be loaded.
pub fn initialize_with(
    config: &MoodConfig,
    emotion: Arc<dyn EmotionClassifier>,
    zero_shot: Arc<dyn ZeroShotClassifier>,
) -> Result<ReplyEngine> {
    let start = Instant::now();
    config.validate()?;

    let clusters = Arc::new(ClusterTable::builtin()?);
    let keywords = Arc::new(KeywordRuleEngine::builtin(&clusters)?);
    let default_label = clusters
        .canonical(&config.pipeline.default_label)
        .cloned()
        .ok_or_else(|| {
            MoodError::Config(format!(
                "pipeline.default_label {:?} is not a canonical label",
                config.pipeline.default_label
            ))
        })?;

    let dataset = load_dataset(&config.dataset)?;
    if !dataset.contains_label(&config.dataset.default_label) {
        warn!(
            label = %config.dataset.default_label,
            "dataset default label has no responses; built-in persona will be used"
        );
    }

    let timeout = Duration::from_secs(config.pipeline.stage_timeout_secs);
    info!(
        emotion = emotion.name(),
        zero_shot = zero_shot.name(),
        threshold = config.pipeline.emotion_threshold,
        timeout_secs = config.pipeline.stage_timeout_secs,
        "classifiers ready"
    );

    let pipeline = LabelPipeline::new(
        keywords,
        EmotionResolver::new(
            emotion,
            clusters.clone(),
            config.pipeline.emotion_threshold,
            default_label.clone(),
            timeout,
        ),
        ZeroShotResolver::new(
            zero_shot,
            clusters.clone(),
            config.classifier.candidate_labels.clone(),
            default_label.clone(),
            timeout,
        ),
        default_label,
    );

    let catalog = Catalog::build(&clusters, &dataset);
    info!(
        labels = catalog.available_emotions.len(),
        personas = catalog.total_celebrities,
        clusters = clusters.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "reply engine ready"
    );

    let selector = ResponseSelector::new(Arc::new(dataset), config.dataset.default_label.clone());
    Ok(ReplyEngine::new(pipeline, selector, catalog))
}

/// Load the configured dataset, or the built-in one.
///
/// The file may hold the nested label map or an array of exported sheet
/// rows; rows are converted with [`ResponseDataset::from_rows`].
///
/// # Errors
///
/// Returns an error if the dataset file is unreadable or invalid.
pub fn load_dataset(config: &DatasetConfig) -> Result<ResponseDataset> {
    let dataset = match &config.path {
        Some(path) => {
            info!(path = %path.display(), "loading response dataset");
            ResponseDataset::from_file(path)?
        }
        None => ResponseDataset::builtin()?,
    };
    Ok(if config.placeholder_images {
        dataset.with_placeholder_images()
    } else {
        dataset
    })
}
