use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, ScriptflowError};

/// Top-level configuration for a Scriptflow dialogue manager.
///
/// Every section falls back to its defaults, so an empty file is a valid
/// configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptflowConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub repeat: RepeatConfig,
    #[serde(default)]
    pub responses: ResponseConfig,
}

impl ScriptflowConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed values are out of range.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScriptflowConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ScriptflowError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.repeat.similarity_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ScriptflowError::Config(format!(
                "repeat.similarity_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if let Some(switch) = self.matching.scenario_switch_threshold {
            if !(0.0..=1.0).contains(&switch) {
                return Err(ScriptflowError::Config(format!(
                    "matching.scenario_switch_threshold must be within [0, 1], got {}",
                    switch
                )));
            }
        }
        if self.repeat.strategy == RepeatStrategy::Keyword
            && self.repeat.phrases.iter().any(|p| p.trim().is_empty())
        {
            return Err(ScriptflowError::Config(
                "repeat.phrases must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Intent matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// A best node score must be strictly greater than this to count as a hit.
    pub min_intent_score: f64,
    /// Redirect the frontier to a root node scoring above this value.
    /// Disabled when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_switch_threshold: Option<f64>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_intent_score: 0.0,
            scenario_switch_threshold: None,
        }
    }
}

/// How replay requests are recognised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatStrategy {
    /// The utterance contains one of the trigger phrases.
    #[default]
    Keyword,
    /// The utterance is similar enough to one of the trigger phrases.
    Similarity,
}

/// Replay ("say that again") settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatConfig {
    pub strategy: RepeatStrategy,
    /// Trigger phrases, matched case-insensitively.
    ///
    /// The keyword strategy matches a phrase anywhere in the utterance. Edges
    /// made of ASCII letters or digits must fall on a word boundary, so
    /// `again` does not fire on `against`. Chinese phrases have no such
    /// boundary: `重复` also fires on `重复购买`.
    pub phrases: Vec<String>,
    /// Used by the similarity strategy only.
    pub similarity_threshold: f64,
    /// Consecutive replays allowed before the limit response is emitted.
    pub max_repeat_count: u32,
    /// Prepended to replayed responses.
    pub replay_prefix: String,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            strategy: RepeatStrategy::Keyword,
            phrases: [
                "重复",
                "再说一遍",
                "没听清",
                "没听清楚",
                "没听懂",
                "你说什么",
                "repeat",
                "again",
                "pardon",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            similarity_threshold: 0.5,
            max_repeat_count: 3,
            replay_prefix: String::new(),
        }
    }
}

/// Fixed response texts for turns that do not render a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseConfig {
    /// Emitted when no available node matches the utterance.
    pub no_match: String,
    /// Emitted on a replay request before anything has been said.
    pub nothing_to_repeat: String,
    /// Emitted once the replay limit is reached.
    pub repeat_limit: String,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            no_match: "抱歉，我没有理解您的意思，请换个说法。".to_string(),
            nothing_to_repeat: "抱歉，没有之前的对话记录。".to_string(),
            repeat_limit: "我已经重复多次了，请继续您的需求。".to_string(),
        }
    }
}
