//! Service configuration, loaded from TOML.

use std::path::{Path, PathBuf};

use moodline_classify::ClassifierConfig;
use serde::{Deserialize, Serialize};

use crate::error::{MoodError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodConfig {
    /// Label pipeline settings.
    pub pipeline: PipelineConfig,
    /// External classifier endpoints.
    pub classifier: ClassifierConfig,
    /// Response dataset source.
    pub dataset: DatasetConfig,
    /// HTTP listener.
    pub server: ServerConfig,
}

/// Label pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Emotion predictions must score strictly above this to be accepted.
    pub emotion_threshold: f32,
    /// Canonical label used when no stage can decide.
    pub default_label: String,
    /// Upper bound on each classifier stage, in seconds.
    pub stage_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            emotion_threshold: 0.3,
            default_label: "greeting".to_owned(),
            stage_timeout_secs: 15,
        }
    }
}

/// Response dataset configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// JSON dataset file, either a label map or an array of sheet rows.
    /// The built-in dataset is used when unset.
    pub path: Option<PathBuf>,
    /// Dataset label used when neither the exact nor a similar label has
    /// responses.
    pub default_label: String,
    /// Fill empty image URLs with generated avatars.
    pub placeholder_images: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            default_label: "greeting".to_owned(),
            placeholder_images: true,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port. `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

impl MoodConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| MoodError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MoodError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/moodline/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("moodline").join("config.toml")
        } else if let Some(home) = dirs::home_dir() {
            home.join(".config").join("moodline").join("config.toml")
        } else {
            std::env::temp_dir().join("moodline").join("config.toml")
        }
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MoodError::Config`] for an out-of-range threshold, a zero
    /// timeout, a blank default label, or an invalid classifier section.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.pipeline.emotion_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MoodError::Config(format!(
                "pipeline.emotion_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.pipeline.stage_timeout_secs == 0 {
            return Err(MoodError::Config(
                "pipeline.stage_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.pipeline.default_label.trim().is_empty() {
            return Err(MoodError::Config("pipeline.default_label must not be empty".into()));
        }
        if self.dataset.default_label.trim().is_empty() {
            return Err(MoodError::Config("dataset.default_label must not be empty".into()));
        }
        for (name, url) in [
            ("classifier.emotion_url", &self.classifier.emotion_url),
            ("classifier.zero_shot_url", &self.classifier.zero_shot_url),
        ] {
            if url.as_deref().is_some_and(|u| u.trim().is_empty()) {
                return Err(MoodError::Config(format!("{name} must not be empty")));
            }
        }
        self.classifier
            .validate()
            .map_err(|e| MoodError::Config(format!("classifier: {e}")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MoodConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.emotion_threshold, 0.3);
        assert_eq!(config.pipeline.default_label, "greeting");
        assert_eq!(config.server.port, 8000);
        assert!(config.dataset.path.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: MoodConfig = toml::from_str(
            r#"
            [pipeline]
            emotion_threshold = 0.5

            [server]
            port = 9001
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.emotion_threshold, 0.5);
        assert_eq!(config.pipeline.stage_timeout_secs, 15);
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.classifier.timeout_seconds, 10);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = MoodConfig::default();
        config.dataset.path = Some(PathBuf::from("/srv/responses.json"));
        config.classifier.api_token = Some("hf_test".into());
        config.save_to_file(&path).unwrap();

        let loaded = MoodConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_nonexistent_returns_io_error() {
        let err = MoodConfig::from_file(Path::new("/nonexistent/moodline/config.toml")).unwrap_err();
        assert!(matches!(err, MoodError::Io(_)));
    }

    #[test]
    fn from_file_invalid_toml_returns_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();
        let err = MoodConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, MoodError::Config(_)));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = MoodConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("moodline"));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        for bad in [-0.1, 1.5, f32::NAN] {
            let mut config = MoodConfig::default();
            config.pipeline.emotion_threshold = bad;
            assert!(config.validate().is_err(), "threshold {bad}");
        }
    }

    #[test]
    fn threshold_bounds_accepted() {
        for ok in [0.0, 1.0] {
            let mut config = MoodConfig::default();
            config.pipeline.emotion_threshold = ok;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn zero_stage_timeout_rejected() {
        let mut config = MoodConfig::default();
        config.pipeline.stage_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_default_labels_rejected() {
        let mut config = MoodConfig::default();
        config.pipeline.default_label = " ".into();
        assert!(config.validate().is_err());

        let mut config = MoodConfig::default();
        config.dataset.default_label = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_endpoint_rejected() {
        let mut config = MoodConfig::default();
        config.classifier.zero_shot_url = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("zero_shot_url"));
    }

    #[test]
    fn empty_candidate_set_rejected() {
        let mut config = MoodConfig::default();
        config.classifier.candidate_labels.clear();
        assert!(matches!(config.validate(), Err(MoodError::Config(_))));
    }
}
