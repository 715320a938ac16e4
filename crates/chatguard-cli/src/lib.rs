//! ChatGuard CLI
//!
//! Command implementations behind the `chatguard` binary. Commands write to
//! any [`std::io::Write`] so they can be driven from tests.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{log_directive, Cli, Commands};
pub use config::load_config;
