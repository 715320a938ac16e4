//! ChatGuard Core
//!
//! Core types and utilities shared across ChatGuard components.
//!
//! This crate provides:
//! - Chat message and moderation flag types
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ChatMessage, Flag, FlagOrigin};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ChatMessage, Flag, FlagOrigin};
}
