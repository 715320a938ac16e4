//! Strictness profiles and their thresholds

use chatguard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Named strictness preset, ordered from loosest to strictest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StrictnessProfile {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "medium")]
    Medium,
    #[default]
    #[serde(alias = "strict")]
    Strict,
}

impl StrictnessProfile {
    /// All profiles, loosest first
    pub const ALL: [StrictnessProfile; 3] = [Self::Low, Self::Medium, Self::Strict];

    /// Built-in thresholds for this profile
    pub fn thresholds(self) -> Thresholds {
        match self {
            Self::Low => Thresholds::LOW,
            Self::Medium => Thresholds::MEDIUM,
            Self::Strict => Thresholds::STRICT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::Strict => "STRICT",
        }
    }
}

impl fmt::Display for StrictnessProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrictnessProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "strict" => Ok(Self::Strict),
            other => Err(Error::config(format!(
                "unknown strictness profile '{other}' (expected low, medium or strict)"
            ))),
        }
    }
}

/// Thresholds carried by a strictness profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Maximum fraction of A-Z characters before the caps rule fires, in (0, 1]
    pub caps_ratio_limit: f64,

    /// Longest run of one repeated character that is still allowed, >= 1
    pub repeat_run_limit: usize,

    /// Minimum delay between two messages from the same sender
    #[serde(default)]
    pub flood_delay_ms: u64,
}

impl Thresholds {
    pub const LOW: Thresholds = Thresholds {
        caps_ratio_limit: 0.8,
        repeat_run_limit: 5,
        flood_delay_ms: 2_000,
    };

    pub const MEDIUM: Thresholds = Thresholds {
        caps_ratio_limit: 0.4,
        repeat_run_limit: 3,
        flood_delay_ms: 4_000,
    };

    pub const STRICT: Thresholds = Thresholds {
        caps_ratio_limit: 0.15,
        repeat_run_limit: 2,
        flood_delay_ms: 6_000,
    };

    /// Flood delay as a duration
    pub fn flood_delay(&self) -> Duration {
        Duration::from_millis(self.flood_delay_ms)
    }

    /// Check the value ranges of a single threshold set
    pub fn validate(&self) -> Result<()> {
        if !(self.caps_ratio_limit > 0.0 && self.caps_ratio_limit <= 1.0) {
            return Err(Error::config(format!(
                "caps_ratio_limit must be in (0, 1], got {}",
                self.caps_ratio_limit
            )));
        }
        if self.repeat_run_limit == 0 {
            return Err(Error::config("repeat_run_limit must be at least 1"));
        }
        Ok(())
    }

    /// Whether both classifier thresholds are at most those of `other`
    pub fn is_at_least_as_strict_as(&self, other: &Thresholds) -> bool {
        self.caps_ratio_limit <= other.caps_ratio_limit
            && self.repeat_run_limit <= other.repeat_run_limit
    }
}

/// Threshold table for the three profiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub low: Thresholds,
    pub medium: Thresholds,
    pub strict: Thresholds,
}

impl ProfileTable {
    /// Thresholds for a profile
    pub fn get(&self, profile: StrictnessProfile) -> &Thresholds {
        match profile {
            StrictnessProfile::Low => &self.low,
            StrictnessProfile::Medium => &self.medium,
            StrictnessProfile::Strict => &self.strict,
        }
    }

    /// Check ranges and ordering.
    ///
    /// STRICT <= MEDIUM <= LOW for both classifier thresholds, with LOW and
    /// STRICT differing in each. Flood delays are ordered the other way.
    pub fn validate(&self) -> Result<()> {
        for profile in StrictnessProfile::ALL {
            self.get(profile)
                .validate()
                .map_err(|e| Error::config(format!("{profile}: {e}")))?;
        }

        if !self.strict.is_at_least_as_strict_as(&self.medium)
            || !self.medium.is_at_least_as_strict_as(&self.low)
        {
            return Err(Error::config(
                "profile thresholds must satisfy STRICT <= MEDIUM <= LOW",
            ));
        }

        if self.strict.caps_ratio_limit >= self.low.caps_ratio_limit {
            return Err(Error::config(
                "caps_ratio_limit must differ between LOW and STRICT",
            ));
        }
        if self.strict.repeat_run_limit >= self.low.repeat_run_limit {
            return Err(Error::config(
                "repeat_run_limit must differ between LOW and STRICT",
            ));
        }

        if self.strict.flood_delay_ms < self.medium.flood_delay_ms
            || self.medium.flood_delay_ms < self.low.flood_delay_ms
        {
            return Err(Error::config(
                "flood delays must satisfy STRICT >= MEDIUM >= LOW",
            ));
        }

        Ok(())
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            low: Thresholds::LOW,
            medium: Thresholds::MEDIUM,
            strict: Thresholds::STRICT,
        }
    }
}
