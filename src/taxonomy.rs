//! Canonical label taxonomy and the raw-label cluster table.
//!
//! External classifiers speak their own vocabularies (`sadness`, `greet`,
//! `joke`, ...). The [`ClusterTable`] folds every known raw label onto one
//! [`CanonicalLabel`], the only label type the pipeline emits.
//!
//! Canonical labels can only be minted by a cluster table, so any label a
//! pipeline stage returns is a member of the taxonomy by construction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{MoodError, Result};

/// A normalised label from the fixed taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalLabel(Arc<str>);

impl CanonicalLabel {
    fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalLabel {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for CanonicalLabel {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for CanonicalLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

// ── Built-in clusters ───────────────────────────────────────────────────

/// (canonical label, raw synonyms)
///
/// `surprise` and `joke` are the emotion-model and zero-shot labels that have
/// no literal counterpart in the taxonomy.
const BUILTIN_CLUSTERS: &[(&str, &[&str])] = &[
    (
        "happy",
        &["happy", "joy", "excited", "enthusiastic", "cheerful", "delighted", "surprise"],
    ),
    ("confident", &["confident", "proud", "assured", "certain", "sure"]),
    ("humorous", &["humorous", "funny", "amused", "entertained", "jovial", "joke"]),
    ("sad", &["sad", "sadness", "depressed", "melancholy", "gloomy", "down"]),
    ("angry", &["angry", "anger", "furious", "irritated", "mad", "frustrated"]),
    ("scared", &["scared", "fear", "afraid", "terrified", "anxious", "worried"]),
    ("greeting", &["greeting", "greet", "hello", "hi", "welcome"]),
    ("romantic", &["romantic", "love", "passionate", "affectionate", "loving"]),
    ("curious", &["curious", "curiosity", "interested", "inquisitive", "questioning"]),
    ("confused", &["confused", "confusion", "puzzled", "uncertain", "doubtful"]),
    ("story", &["story", "narrative", "tale", "anecdote"]),
    ("insult", &["insult", "offensive", "rude", "disrespectful"]),
    ("casual", &["casual", "normal", "regular", "ordinary", "everyday"]),
    ("bye", &["bye", "goodbye", "farewell", "see you"]),
    ("thanks", &["thanks", "thankful", "grateful", "appreciative"]),
    ("advice", &["advice", "helpful", "suggestive", "recommendation"]),
    ("song", &["song", "music", "singing", "melody"]),
];

fn normalise(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One canonical label with the raw synonyms that map onto it.
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    /// The canonical label.
    pub label: CanonicalLabel,
    /// Raw synonyms, normalised, in declaration order.
    pub synonyms: Vec<String>,
}

/// Reverse index from raw classifier labels to canonical labels.
#[derive(Debug, Clone)]
pub struct ClusterTable {
    clusters: Vec<Cluster>,
    reverse: HashMap<String, CanonicalLabel>,
}

impl ClusterTable {
    /// Build a table from `(canonical, synonyms)` pairs.
    ///
    /// Labels are trimmed and lower-cased. Every canonical label also maps
    /// onto itself.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Taxonomy`] if a label is blank, a canonical label
    /// is declared twice, or a raw label is claimed by two canonical labels.
    pub fn new<I, C, S, R>(clusters: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        let mut table = Self {
            clusters: Vec::new(),
            reverse: HashMap::new(),
        };

        for (canonical, synonyms) in clusters {
            let name = normalise(canonical.as_ref());
            if name.is_empty() {
                return Err(MoodError::Taxonomy("canonical label must not be blank".into()));
            }
            if table.canonical(&name).is_some() {
                return Err(MoodError::Taxonomy(format!(
                    "canonical label {name:?} declared twice"
                )));
            }
            let label = CanonicalLabel::new(&name);

            let mut cluster = Cluster {
                label: label.clone(),
                synonyms: Vec::new(),
            };
            table.claim(&name, &label)?;

            for raw in synonyms {
                let raw = normalise(raw.as_ref());
                if raw.is_empty() {
                    return Err(MoodError::Taxonomy(format!(
                        "blank synonym in cluster {name:?}"
                    )));
                }
                table.claim(&raw, &label)?;
                if !cluster.synonyms.contains(&raw) {
                    cluster.synonyms.push(raw);
                }
            }
            table.clusters.push(cluster);
        }

        Ok(table)
    }

    /// The built-in taxonomy.
    ///
    /// # Errors
    ///
    /// Never fails for the shipped table; the `Result` keeps construction
    /// uniform with [`ClusterTable::new`].
    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_CLUSTERS.iter().map(|(c, s)| (*c, s.iter().copied())))
    }

    fn claim(&mut self, raw: &str, label: &CanonicalLabel) -> Result<()> {
        match self.reverse.get(raw) {
            Some(existing) if existing != label => Err(MoodError::Taxonomy(format!(
                "raw label {raw:?} claimed by both {existing} and {label}"
            ))),
            Some(_) => Ok(()),
            None => {
                self.reverse.insert(raw.to_owned(), label.clone());
                Ok(())
            }
        }
    }

    /// Map a raw classifier label onto its canonical label.
    pub fn lookup(&self, raw: &str) -> Option<&CanonicalLabel> {
        self.reverse.get(&normalise(raw))
    }

    /// Return the canonical label named `name`, if it is part of the taxonomy.
    ///
    /// Unlike [`lookup`](Self::lookup) this does not resolve synonyms.
    pub fn canonical(&self, name: &str) -> Option<&CanonicalLabel> {
        let name = normalise(name);
        self.clusters
            .iter()
            .map(|c| &c.label)
            .find(|l| l.as_str() == name)
    }

    /// Canonical labels in declaration order.
    pub fn labels(&self) -> impl Iterator<Item = &CanonicalLabel> {
        self.clusters.iter().map(|c| &c.label)
    }

    /// All clusters in declaration order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of canonical labels.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns `true` if the taxonomy is empty.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}
