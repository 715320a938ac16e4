//! Configuration loading

use anyhow::Context;
use chatguard_classifiers::StrictnessProfile;
use chatguard_moderation::GuardConfig;
use std::path::Path;
use tracing::debug;

/// Load configuration from file and apply the CLI profile override.
///
/// A missing file yields the default configuration.
pub fn load_config(
    config_path: &Path,
    profile: Option<StrictnessProfile>,
) -> anyhow::Result<GuardConfig> {
    let mut config = if config_path.exists() {
        GuardConfig::from_file(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?
    } else {
        debug!(path = %config_path.display(), "no config file, using defaults");
        GuardConfig::default()
    };

    if let Some(profile) = profile {
        config.profile = profile;
    }

    Ok(config)
}
