//! Read-only summary of the taxonomy and dataset, served by `GET /emotions`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::ResponseDataset;
use crate::taxonomy::ClusterTable;

/// What the service can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    /// Dataset labels, sorted.
    pub available_emotions: Vec<String>,
    /// Canonical label → raw synonyms.
    pub emotion_clusters: BTreeMap<String, Vec<String>>,
    /// Persona entries across all labels.
    pub total_celebrities: usize,
}

impl Catalog {
    pub fn build(clusters: &ClusterTable, dataset: &ResponseDataset) -> Self {
        Self {
            available_emotions: dataset.labels().map(str::to_owned).collect(),
            emotion_clusters: clusters
                .clusters()
                .iter()
                .map(|c| (c.label.to_string(), c.synonyms.clone()))
                .collect(),
            total_celebrities: dataset.persona_count(),
        }
    }
}
