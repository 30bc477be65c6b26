//! Concrete classifier backends and config-driven construction.

pub mod inference_api;
pub mod offline;

use std::sync::Arc;

pub use inference_api::{InferenceApiEmotion, InferenceApiZeroShot};
pub use offline::OfflineClassifier;

use crate::classifier::{EmotionClassifier, ZeroShotClassifier};
use crate::config::ClassifierConfig;
use crate::error::ClassifyError;

/// Build the emotion backend described by `config`.
///
/// An unset endpoint yields [`OfflineClassifier`].
///
/// # Errors
///
/// Returns [`ClassifyError::Config`] if `config` is invalid.
pub fn emotion_from_config(
    config: &ClassifierConfig,
) -> Result<Arc<dyn EmotionClassifier>, ClassifyError> {
    config.validate()?;
    Ok(match &config.emotion_url {
        Some(url) => Arc::new(InferenceApiEmotion::new(url.clone(), config)?),
        None => Arc::new(OfflineClassifier),
    })
}

/// Build the zero-shot backend described by `config`.
///
/// An unset endpoint yields [`OfflineClassifier`].
///
/// # Errors
///
/// Returns [`ClassifyError::Config`] if `config` is invalid.
pub fn zero_shot_from_config(
    config: &ClassifierConfig,
) -> Result<Arc<dyn ZeroShotClassifier>, ClassifyError> {
    config.validate()?;
    Ok(match &config.zero_shot_url {
        Some(url) => Arc::new(InferenceApiZeroShot::new(url.clone(), config)?),
        None => Arc::new(OfflineClassifier),
    })
}
