//! ChatGuard Classifiers
//!
//! Classifiers for game-server chat.
//!
//! - [`filter`]: the caps / repeat message filter. Pure and synchronous;
//!   verdicts depend only on the message and the active strictness profile.
//! - [`toxicity`], [`patterns`]: content signals implementing
//!   [`Classifier`], used by the moderation layer to raise flags that the
//!   filter never overrides.

pub mod classifier;
pub mod filter;
pub mod patterns;
pub mod profile;
pub mod toxicity;
pub mod verdict;

pub use classifier::{Classifier, SignalMetadata, SignalResult};
pub use filter::{classify, classify_with, find_repeat_run, SpamFilter, CAPS_EXEMPT_LENGTH};
pub use patterns::{PatternClassifier, PhraseSpec};
pub use profile::{ProfileTable, StrictnessProfile, Thresholds};
pub use toxicity::ToxicityClassifier;
pub use verdict::{ClassificationResult, ReasonCode, RepeatRun};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classifier, SignalResult};
    pub use crate::filter::{classify, SpamFilter};
    pub use crate::patterns::PatternClassifier;
    pub use crate::profile::{ProfileTable, StrictnessProfile, Thresholds};
    pub use crate::toxicity::ToxicityClassifier;
    pub use crate::verdict::{ClassificationResult, ReasonCode};
}
