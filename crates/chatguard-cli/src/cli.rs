use chatguard_classifiers::StrictnessProfile;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chatguard")]
#[command(
    author,
    version,
    about = "Game-server chat filter with LOW / MEDIUM / STRICT profiles"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        default_value = "chatguard.yaml",
        env = "CHATGUARD_CONFIG"
    )]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify messages (arguments, or one per stdin line); exits 1 if any is blocked
    Check {
        /// Messages to classify
        messages: Vec<String>,

        /// Strictness profile: low, medium or strict
        #[arg(short, long, value_parser = parse_profile)]
        profile: Option<StrictnessProfile>,

        /// Print one JSON object per message
        #[arg(long)]
        json: bool,
    },

    /// Re-evaluate a chat history file under a profile
    Scan {
        /// History file (YAML list of messages)
        history: PathBuf,

        /// Strictness profile: low, medium or strict
        #[arg(short, long, value_parser = parse_profile)]
        profile: Option<StrictnessProfile>,

        /// Print the re-evaluated history as JSON
        #[arg(long)]
        json: bool,

        /// Print Prometheus metrics after the run
        #[arg(long)]
        metrics: bool,
    },

    /// Submit a chat history through the room: lock, flood delay, signals, filter
    Replay {
        /// History file (YAML list of messages)
        history: PathBuf,

        /// Strictness profile: low, medium or strict
        #[arg(short, long, value_parser = parse_profile)]
        profile: Option<StrictnessProfile>,

        /// Print one JSON object per submission
        #[arg(long)]
        json: bool,

        /// Print Prometheus metrics after the run
        #[arg(long)]
        metrics: bool,
    },

    /// Show the threshold table
    Profiles,
}

impl Commands {
    /// Profile override given on the command line
    pub fn profile(&self) -> Option<StrictnessProfile> {
        match self {
            Self::Check { profile, .. }
            | Self::Scan { profile, .. }
            | Self::Replay { profile, .. } => *profile,
            Self::Profiles => None,
        }
    }

    /// Whether Prometheus output was requested
    pub fn wants_metrics(&self) -> bool {
        matches!(
            self,
            Self::Scan { metrics: true, .. } | Self::Replay { metrics: true, .. }
        )
    }
}

fn parse_profile(s: &str) -> Result<StrictnessProfile, String> {
    s.parse().map_err(|e: chatguard_core::Error| e.to_string())
}

/// Log filter directive used when `RUST_LOG` is not set
pub fn log_directive(verbose: bool) -> &'static str {
    if verbose {
        "chatguard=debug"
    } else {
        "chatguard=info"
    }
}
