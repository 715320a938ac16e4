//! Moderation configuration

use chatguard_classifiers::{PhraseSpec, ProfileTable, StrictnessProfile};
use chatguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chat guard configuration, usually read from `chatguard.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Active strictness profile
    #[serde(default)]
    pub profile: StrictnessProfile,

    /// Senders that bypass every check and are never re-evaluated
    #[serde(default = "default_staff")]
    pub staff: Vec<String>,

    /// Threshold table for the three profiles
    #[serde(default)]
    pub thresholds: ProfileTable,

    /// Toxicity signal settings
    #[serde(default)]
    pub toxicity: ToxicityConfig,

    /// Phrases that flag a message outright; a trailing `*` matches a
    /// word prefix (`cheat*`)
    #[serde(default)]
    pub blocked_phrases: Vec<PhraseSpec>,

    /// Hide signal-flagged messages from everyone but their sender and staff
    #[serde(default = "default_true")]
    pub shadow_mute: bool,

    /// Keep a hash-chained audit trail
    #[serde(default = "default_true")]
    pub audit: bool,
}

impl GuardConfig {
    /// Parse configuration from YAML and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check thresholds, signal settings and phrases
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;

        let threshold = self.toxicity.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::config(format!(
                "toxicity threshold must be in (0, 1], got {threshold}"
            )));
        }

        for phrase in &self.blocked_phrases {
            phrase.validate()?;
        }

        Ok(())
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            profile: StrictnessProfile::default(),
            staff: default_staff(),
            thresholds: ProfileTable::default(),
            toxicity: ToxicityConfig::default(),
            blocked_phrases: Vec::new(),
            shadow_mute: true,
            audit: true,
        }
    }
}

/// Toxicity signal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToxicityConfig {
    /// Run the toxicity lexicon on submitted messages
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Score at which a message is flagged
    #[serde(default = "default_toxicity_threshold")]
    pub threshold: f32,
}

impl Default for ToxicityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_toxicity_threshold(),
        }
    }
}

fn default_staff() -> Vec<String> {
    vec!["Admin".to_string()]
}

fn default_toxicity_threshold() -> f32 {
    0.5
}

fn default_true() -> bool {
    true
}
