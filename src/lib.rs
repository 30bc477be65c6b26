//! Moodline: hybrid emotion and intent labelling with persona replies.
//!
//! Free-form text is resolved to one canonical label, then answered with a
//! randomly chosen persona's line for that label:
//! text → keywords → emotion model → zero-shot model → label → persona reply
//!
//! # Architecture
//!
//! - **Taxonomy**: a fixed set of canonical labels and the raw classifier
//!   labels that fold onto them
//! - **Keywords**: ordered substring rules, checked first and free of I/O
//! - **Resolvers**: the emotion stage (confidence-gated) and the zero-shot
//!   stage (always decides), both behind injected classifier traits
//! - **Pipeline**: runs the stages in order and never fails
//! - **Selector**: exact, similar, default-label, and built-in fallback tiers
//! - **Server**: `axum` routes over the [`ReplyEngine`]
//!
//! ## Security
//!
//! - Input text is logged only at trace level
//! - The API token is sent only to the configured classifier endpoints

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod pipeline;
pub mod resolver;
pub mod selector;
pub mod server;
pub mod startup;
pub mod taxonomy;

pub use catalog::Catalog;
pub use config::MoodConfig;
pub use dataset::{ResponseArtifact, ResponseDataset};
pub use engine::{Reply, ReplyEngine};
pub use error::{MoodError, Result};
pub use keywords::KeywordRuleEngine;
pub use pipeline::{LabelPipeline, Resolution, ResolutionStage};
pub use selector::{ResponseSelector, Selection, SelectionTier};
pub use server::MoodServer;
pub use taxonomy::{CanonicalLabel, ClusterTable};
