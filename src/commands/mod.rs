// Command handlers module
pub mod analyze;
pub mod config;
pub mod events;
pub mod monitor;
pub mod reports;
pub mod snapshot;
pub mod version;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::MonitorConfig;

/// Load the config named by the global `--config` option (or the default
/// location) and apply `--interval` / `--log-dir` overrides.
pub fn load_config(matches: &ArgMatches) -> Result<MonitorConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => MonitorConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => MonitorConfig::load()?,
    };

    if let Some(interval) = matches.get_one::<u64>("interval") {
        config.poll_interval_ms = *interval;
    }
    if let Some(log_dir) = matches.get_one::<PathBuf>("log-dir") {
        config.log_dir = log_dir.clone();
    }

    config.validate()?;
    Ok(config)
}

// Re-exports for cleaner imports
pub use version::execute as version;
