use std::time::Duration;

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::crash_monitor::{EventLogSource, WindowsEventLog};
use crate::core::MonitorConfig;
use crate::ui::format_time;

/// Print recent application errors from the OS event log
pub fn execute(matches: &ArgMatches, config: &MonitorConfig) -> Result<()> {
    let minutes = matches
        .get_one::<u32>("minutes")
        .copied()
        .unwrap_or(config.event_log.window_minutes);

    let source = WindowsEventLog::new(&config.event_log);
    let entries = source
        .query(Duration::from_secs(u64::from(minutes) * 60))
        .context("Failed to read the application event log")?;

    if entries.is_empty() {
        println!(
            "{}",
            format!("No application errors in the last {} minutes", minutes).green()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("{} application error(s) in the last {} minutes:", entries.len(), minutes).bold()
    );
    for entry in &entries {
        let time = entry
            .time
            .as_ref()
            .map(format_time)
            .unwrap_or_else(|| "unknown time".to_string());
        println!(
            "{} {} {}",
            time.dimmed(),
            entry.source.cyan(),
            format!("(id {})", entry.event_id).dimmed()
        );
        println!("    {}", entry.message.trim());
    }

    Ok(())
}
