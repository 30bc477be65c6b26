//! The persona response dataset: label → persona → {image, text, audio}.
//!
//! Loaded once at startup and shared read-only. Validation happens at load
//! time and is fatal, so request handling can rely on every label having at
//! least one persona with a usable artifact.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{MoodError, Result};

/// Seed dataset compiled into the binary.
const BUILTIN_DATASET: &str = include_str!("../data/responses.json");

/// One persona's response for a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseArtifact {
    /// Avatar image URL, or empty.
    #[serde(default)]
    pub image: String,
    /// Dialogue line.
    pub text: String,
    /// Audio clip URL.
    pub audio: String,
}

/// A spreadsheet-style dataset row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetRow {
    /// Persona name.
    #[serde(default)]
    pub character: String,
    /// Dataset label.
    #[serde(default)]
    pub emotion: String,
    /// Audio clip URL.
    #[serde(default)]
    pub audio: String,
    /// Dialogue line.
    #[serde(default)]
    pub dialogue: String,
    /// Avatar image URL.
    #[serde(default)]
    pub image: String,
}

type PersonaMap = BTreeMap<String, ResponseArtifact>;

/// Accepted on-disk shapes: the nested label map, or exported sheet rows.
#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetFile {
    Map(BTreeMap<String, PersonaMap>),
    Rows(Vec<DatasetRow>),
}

/// Immutable label → persona → artifact table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseDataset {
    entries: BTreeMap<String, PersonaMap>,
}

impl ResponseDataset {
    /// A dataset with no labels. Selection from it always reaches the
    /// built-in fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and wrap a label → persona → artifact map.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Dataset`] for a blank label, a label without
    /// personas, a blank persona name, or an artifact with empty text or audio.
    pub fn from_map(entries: BTreeMap<String, PersonaMap>) -> Result<Self> {
        for (label, personas) in &entries {
            if label.trim().is_empty() {
                return Err(MoodError::Dataset("blank label".into()));
            }
            if personas.is_empty() {
                return Err(MoodError::Dataset(format!("label {label:?} has no personas")));
            }
            for (persona, artifact) in personas {
                if persona.trim().is_empty() {
                    return Err(MoodError::Dataset(format!(
                        "label {label:?} has a blank persona name"
                    )));
                }
                if artifact.text.trim().is_empty() {
                    return Err(MoodError::Dataset(format!(
                        "{label}/{persona}: text is empty"
                    )));
                }
                if artifact.audio.trim().is_empty() {
                    return Err(MoodError::Dataset(format!(
                        "{label}/{persona}: audio is empty"
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON dataset: either a label → persona → artifact object or
    /// an array of [`DatasetRow`]s.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Dataset`] if the JSON is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: DatasetFile =
            serde_json::from_str(json).map_err(|e| MoodError::Dataset(e.to_string()))?;
        match file {
            DatasetFile::Map(entries) => Self::from_map(entries),
            DatasetFile::Rows(rows) => Self::from_rows(rows),
        }
    }

    /// Load a JSON dataset from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Io`] if the file cannot be read, or
    /// [`MoodError::Dataset`] if it is malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
            .map_err(|e| MoodError::Dataset(format!("{}: {e}", path.display())))
    }

    /// The seed dataset shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Dataset`] if the embedded JSON is malformed.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_DATASET)
    }

    /// Build a dataset from spreadsheet rows.
    ///
    /// Fields are trimmed. Rows without a character or emotion are skipped,
    /// as are rows without dialogue or audio. A later row for the same label
    /// and persona replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Dataset`] if the resulting dataset fails validation.
    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = DatasetRow>,
    {
        let mut entries: BTreeMap<String, PersonaMap> = BTreeMap::new();
        for row in rows {
            let character = row.character.trim();
            let emotion = row.emotion.trim();
            if character.is_empty() || emotion.is_empty() {
                debug!("skipping dataset row without character or emotion");
                continue;
            }
            if row.dialogue.trim().is_empty() || row.audio.trim().is_empty() {
                warn!(
                    label = emotion,
                    persona = character,
                    "skipping dataset row without dialogue or audio"
                );
                continue;
            }
            let artifact = ResponseArtifact {
                image: row.image.trim().to_owned(),
                text: row.dialogue.trim().to_owned(),
                audio: row.audio.trim().to_owned(),
            };
            let replaced = entries
                .entry(emotion.to_owned())
                .or_default()
                .insert(character.to_owned(), artifact);
            if replaced.is_some() {
                debug!(label = emotion, persona = character, "dataset row replaced earlier row");
            }
        }
        Self::from_map(entries)
    }

    /// Replace every empty `image` with a generated avatar URL for the persona.
    pub fn with_placeholder_images(mut self) -> Self {
        for personas in self.entries.values_mut() {
            for (persona, artifact) in personas.iter_mut() {
                if artifact.image.trim().is_empty() {
                    artifact.image = placeholder_image_url(persona);
                }
            }
        }
        self
    }

    /// Personas for `label`, if the label exists.
    pub fn personas(&self, label: &str) -> Option<&PersonaMap> {
        self.entries.get(label)
    }

    /// The artifact for `label` and `persona`.
    pub fn get(&self, label: &str, persona: &str) -> Option<&ResponseArtifact> {
        self.entries.get(label).and_then(|p| p.get(persona))
    }

    /// Returns `true` if `label` is present.
    pub fn contains_label(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Dataset labels in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total persona entries across all labels. A persona appearing under
    /// two labels counts twice.
    pub fn persona_count(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no labels.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Avatar URL generated from a persona name.
pub fn placeholder_image_url(persona: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=random&color=fff&size=128&rounded=true&bold=true",
        urlencoding::encode(persona)
    )
}
