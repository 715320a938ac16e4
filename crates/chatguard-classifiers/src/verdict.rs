//! Verdict produced by the message filter

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule that caused a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReasonCode {
    /// Too large a share of upper-case letters
    Caps,
    /// A character repeated too many times in a row
    Repeats,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Caps => "CAPS",
            Self::Repeats => "REPEATS",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximal run of one repeated character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatRun {
    pub character: char,
    pub length: usize,
}

/// Outcome of classifying one message.
///
/// Built only through [`ClassificationResult::allowed`],
/// [`ClassificationResult::caps`] and [`ClassificationResult::repeats`], so a
/// blocked result always carries a reason code and detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    blocked: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    reason_code: Option<ReasonCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl ClassificationResult {
    /// Message passes every rule
    pub fn allowed() -> Self {
        Self {
            blocked: false,
            reason_code: None,
            detail: None,
        }
    }

    /// Blocked by the caps rule with the rounded caps percentage
    pub fn caps(percent: u32) -> Self {
        Self {
            blocked: true,
            reason_code: Some(ReasonCode::Caps),
            detail: Some(format!("{percent}%")),
        }
    }

    /// Blocked by the repeat rule
    pub fn repeats(run: RepeatRun) -> Self {
        Self {
            blocked: true,
            reason_code: Some(ReasonCode::Repeats),
            detail: Some(format!("{:?} x{}", run.character, run.length)),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn reason_code(&self) -> Option<ReasonCode> {
        self.reason_code
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Reason shown next to a blocked message, e.g. `CAPS (91%)` or `REPEATS`
    pub fn reason(&self) -> Option<String> {
        match self.reason_code? {
            ReasonCode::Caps => Some(format!(
                "CAPS ({})",
                self.detail.as_deref().unwrap_or_default()
            )),
            ReasonCode::Repeats => Some(ReasonCode::Repeats.to_string()),
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "blocked: {reason}"),
            None => f.write_str("allowed"),
        }
    }
}
