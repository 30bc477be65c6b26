//! # moodline-classify
//!
//! The external classifier boundary for moodline.
//!
//! The label pipeline consumes two kinds of statistical classifier, a
//! text-emotion model and a zero-shot intent model. Neither is run in
//! process: this crate defines the [`EmotionClassifier`] and
//! [`ZeroShotClassifier`] traits the pipeline depends on, plus backends that
//! talk to hosted inference endpoints.
//!
//! ## Design
//!
//! - Classifiers are injected as `Arc<dyn Trait>` so tests can substitute
//!   deterministic stand-ins
//! - Every failure is a distinguishable [`ClassifyError`] variant
//! - HTTP requests carry an explicit timeout
//! - An unset endpoint selects [`backends::OfflineClassifier`], which always
//!   reports itself unavailable
//!
//! ## Security
//!
//! - API tokens never appear in errors or logs
//! - Input text is logged only at trace level

pub mod backends;
pub mod classifier;
pub mod config;
pub mod error;
pub mod http;
pub mod types;

pub use classifier::{EmotionClassifier, ZeroShotClassifier};
pub use config::ClassifierConfig;
pub use error::{ClassifyError, Result};
pub use types::{EmotionPrediction, ZeroShotRanking, ZeroShotScore};
