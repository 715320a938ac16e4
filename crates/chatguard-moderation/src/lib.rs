//! ChatGuard Moderation
//!
//! Moderation layer around the chat filter.
//!
//! A [`ChatRoom`] holds message history and applies, per submitted message:
//! - chat lock and per-sender flood delay
//! - content signals (toxicity lexicon, blocked phrases)
//! - the caps / repeat filter under the active strictness profile
//!
//! Changing the profile re-evaluates the filter's verdicts across the whole
//! history; moderator and signal flags are left alone.

pub mod config;
pub mod flood;
pub mod room;

pub use config::{GuardConfig, ToxicityConfig};
pub use flood::FloodGuard;
pub use room::{ChatRoom, Rejection, SignalHook, SubmitOutcome};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::GuardConfig;
    pub use crate::room::{ChatRoom, Rejection, SubmitOutcome};
}
