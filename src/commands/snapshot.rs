use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::crash_monitor::{SysinfoProbe, SystemProbe};
use crate::core::MonitorConfig;
use crate::ui::format_uptime;

/// Take one snapshot and print it as JSON
pub fn execute(config: &MonitorConfig) -> Result<()> {
    let mut probe = SysinfoProbe::new(config);
    let snapshot = probe.snapshot();

    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
    println!("{}", json);

    match &snapshot.target_process {
        Some(proc) => eprintln!(
            "{}",
            format!(
                "{} is running ({}, PID {}, up {})",
                config.target.display_name,
                proc.name,
                proc.pid,
                format_uptime(proc.uptime_secs)
            )
            .green()
        ),
        None => eprintln!(
            "{}",
            format!("{} is not running", config.target.display_name).yellow()
        ),
    }

    Ok(())
}
