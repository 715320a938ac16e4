//! Caps / repeat message filter (Tier A)
//!
//! The filter is a pure function of the message and a threshold pair: no
//! state, no clock, no randomness. The caps rule is checked before the
//! repeat rule, so a message violating both reports `CAPS`.

use crate::profile::{ProfileTable, StrictnessProfile, Thresholds};
use crate::verdict::{ClassificationResult, RepeatRun};
use chatguard_core::Result;
use tracing::debug;

/// Messages this short or shorter are never blocked for caps
pub const CAPS_EXEMPT_LENGTH: usize = 4;

/// Classify a message under one of the built-in profiles
pub fn classify(message: &str, profile: StrictnessProfile) -> ClassificationResult {
    classify_with(message, &profile.thresholds())
}

/// Classify a message against an explicit threshold pair
pub fn classify_with(message: &str, thresholds: &Thresholds) -> ClassificationResult {
    let length = message.chars().count();

    if length > CAPS_EXEMPT_LENGTH {
        let caps = message.chars().filter(|c| c.is_ascii_uppercase()).count();
        let ratio = caps as f64 / length as f64;
        if ratio > thresholds.caps_ratio_limit {
            return ClassificationResult::caps((ratio * 100.0).round() as u32);
        }
    }

    match find_repeat_run(message, thresholds.repeat_run_limit) {
        Some(run) => ClassificationResult::repeats(run),
        None => ClassificationResult::allowed(),
    }
}

/// First maximal run longer than `limit`, if any
pub fn find_repeat_run(message: &str, limit: usize) -> Option<RepeatRun> {
    let mut chars = message.chars().peekable();

    while let Some(character) = chars.next() {
        let mut length = 1;
        while chars.next_if_eq(&character).is_some() {
            length += 1;
        }
        if length > limit {
            return Some(RepeatRun { character, length });
        }
    }

    None
}

/// Message filter bound to a validated profile table
#[derive(Debug, Clone, Default)]
pub struct SpamFilter {
    table: ProfileTable,
}

impl SpamFilter {
    /// Create a filter, rejecting tables that break profile ordering
    pub fn new(table: ProfileTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    /// Classify a message under the given profile
    pub fn classify(&self, message: &str, profile: StrictnessProfile) -> ClassificationResult {
        let result = classify_with(message, self.table.get(profile));
        if let Some(reason) = result.reason() {
            debug!(%profile, %reason, "message blocked by filter");
        }
        result
    }

    pub fn thresholds(&self, profile: StrictnessProfile) -> &Thresholds {
        self.table.get(profile)
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }
}
