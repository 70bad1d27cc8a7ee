use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::MonitorConfig;

/// `config show|init|path`
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config_path = match matches.get_one::<PathBuf>("config") {
        Some(path) => path.clone(),
        None => MonitorConfig::get_config_path()?,
    };

    match matches.subcommand() {
        Some(("show", _)) => {
            let config = super::load_config(matches)?;
            let json =
                serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", json);
        }
        Some(("init", sub_matches)) => {
            if config_path.exists() && !sub_matches.get_flag("force") {
                println!(
                    "{}",
                    format!(
                        "Config already exists at {} (use --force to overwrite)",
                        config_path.display()
                    )
                    .yellow()
                );
                return Ok(());
            }
            MonitorConfig::default().save_to(&config_path)?;
            println!(
                "{}",
                format!("Wrote default config to {}", config_path.display()).green()
            );
        }
        Some(("path", _)) => {
            println!("{}", config_path.display());
        }
        _ => {
            println!("Use 'crashwatch config --help' for more information.");
        }
    }

    Ok(())
}
