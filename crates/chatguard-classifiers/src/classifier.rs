//! Content signal trait and common types
//!
//! Signals are independent content checks (toxicity lexicon, blocked
//! phrases) whose flags are owned by the moderation layer rather than by
//! the caps / repeat filter.

use chatguard_core::Result;

/// Trait for all content signals
pub trait Classifier: Send + Sync {
    /// Score the given text
    fn classify(&self, text: &str) -> Result<SignalResult>;

    /// Get the signal name
    fn name(&self) -> &str;
}

/// Result of a content signal
#[derive(Debug, Clone)]
pub struct SignalResult {
    /// Classification label
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,

    /// Additional metadata
    pub metadata: SignalMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl SignalResult {
    /// Create a new signal result
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
            metadata: SignalMetadata::default(),
            latency_us: 0,
        }
    }

    /// Check if score reaches threshold
    pub fn exceeds_threshold(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

/// Metadata about a signal result
#[derive(Debug, Clone, Default)]
pub struct SignalMetadata {
    /// Matched byte spans
    pub spans: Vec<(usize, usize)>,

    /// Lexicon or model name
    pub model: Option<String>,
}
