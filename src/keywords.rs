//! Deterministic keyword rules: the first stage of the label pipeline.
//!
//! Rules are scanned in declaration order and the first rule with any trigger
//! contained in the lower-cased text wins. Order matters more than match
//! quality: `"im happy but sad"` resolves to whichever rule is declared first.
//!
//! Triggers are plain substrings, so short triggers like `hi` also fire
//! inside longer words (`this`, `think`).

use crate::error::{MoodError, Result};
use crate::taxonomy::{CanonicalLabel, ClusterTable};

/// (triggers, canonical label), in precedence order.
const BUILTIN_RULES: &[(&[&str], &str)] = &[
    (&["happy", "joy", "excited", "great", "wonderful", "amazing"], "happy"),
    (&["confident", "sure", "certain", "proud"], "confident"),
    (&["funny", "humor", "laugh", "hehe", "joke"], "humorous"),
    (&["sad", "depressed", "unhappy", "miserable", "down"], "sad"),
    (&["angry", "mad", "furious", "irritated", "frustrated"], "angry"),
    (&["scared", "fear", "afraid", "terrified", "anxious", "worried"], "scared"),
    (&["hello", "hi", "hey", "morning", "good morning"], "greeting"),
    (&["love", "romantic", "romance", "passionate"], "romantic"),
    (&["curious", "curiosity", "ask", "question", "wonder"], "curious"),
    (&["confused", "confusion", "doubt", "uncertain", "puzzled"], "confused"),
    (&["story", "tale", "narrative"], "story"),
    (&["insult", "stupid", "idiot", "dumb", "ego"], "insult"),
    (&["casual", "normal", "regular", "ordinary"], "casual"),
    (&["bye", "goodbye", "see you", "later"], "bye"),
    (&["thank", "thanks", "grateful"], "thanks"),
    (&["advice", "help", "suggest", "recommend"], "advice"),
    (&["sing", "song", "music", "tune", "melody"], "song"),
];

/// One ordered rule: any trigger substring maps the text to `label`.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    triggers: Vec<String>,
    label: CanonicalLabel,
}

impl KeywordRule {
    /// Create a rule. Triggers are lower-cased.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Taxonomy`] if there are no triggers or any
    /// trigger is blank, since an empty substring would match every input.
    pub fn new<I, S>(triggers: I, label: CanonicalLabel) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let triggers: Vec<String> = triggers
            .into_iter()
            .map(|t| t.as_ref().to_lowercase())
            .collect();
        if triggers.is_empty() {
            return Err(MoodError::Taxonomy(format!("rule for {label} has no triggers")));
        }
        if triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(MoodError::Taxonomy(format!("rule for {label} has a blank trigger")));
        }
        Ok(Self { triggers, label })
    }

    /// The label this rule produces.
    pub fn label(&self) -> &CanonicalLabel {
        &self.label
    }

    /// Lower-cased trigger substrings.
    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    fn fires(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t.as_str()))
    }
}

/// Ordered, first-match-wins keyword matcher.
#[derive(Debug, Clone, Default)]
pub struct KeywordRuleEngine {
    rules: Vec<KeywordRule>,
}

impl KeywordRuleEngine {
    /// Create an engine from rules in precedence order.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Build rules from a `(triggers, label)` table, resolving each label
    /// against the taxonomy.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Taxonomy`] if a label is not a canonical label of
    /// `clusters` or a rule has no usable triggers.
    pub fn from_table(table: &[(&[&str], &str)], clusters: &ClusterTable) -> Result<Self> {
        let rules = table
            .iter()
            .map(|(triggers, label)| {
                let canonical = clusters.canonical(label).ok_or_else(|| {
                    MoodError::Taxonomy(format!("keyword rule label {label:?} is not canonical"))
                })?;
                KeywordRule::new(triggers.iter(), canonical.clone())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    /// The built-in rule set.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Taxonomy`] if `clusters` lacks a label the
    /// built-in rules produce.
    pub fn builtin(clusters: &ClusterTable) -> Result<Self> {
        Self::from_table(BUILTIN_RULES, clusters)
    }

    /// Return the label of the first rule with a trigger contained in `text`.
    pub fn match_label(&self, text: &str) -> Option<&CanonicalLabel> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.fires(&lowered))
            .map(KeywordRule::label)
    }

    /// Rules in precedence order.
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
