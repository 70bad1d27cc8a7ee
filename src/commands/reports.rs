use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::Colorize;

use crate::core::crash_monitor::ReportStore;
use crate::core::MonitorConfig;
use crate::ui::{format_size, format_time};

/// List persisted crash reports in the log directory
pub fn execute(config: &MonitorConfig) -> Result<()> {
    let store = ReportStore::new(&config.log_dir)
        .with_context(|| format!("Failed to open log directory {:?}", config.log_dir))?;
    let reports = store.list().context("Failed to list crash reports")?;

    if reports.is_empty() {
        println!("No crash reports in {}", store.dir().display());
        return Ok(());
    }

    println!(
        "{}",
        format!("{} crash report(s) in {}:", reports.len(), store.dir().display()).bold()
    );
    for path in &reports {
        let metadata = fs::metadata(path).ok();
        let size = metadata.as_ref().map(|m| format_size(m.len())).unwrap_or_default();
        let modified = metadata
            .and_then(|m| m.modified().ok())
            .map(|t| format_time(&DateTime::<Local>::from(t)))
            .unwrap_or_default();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("  {}  {:>8}  {}", modified.dimmed(), size, name.cyan());
    }

    Ok(())
}
