//! Crash monitor command handler.
//!
//! Runs the monitor in the TUI dashboard, or headless with colored console
//! output when `--headless` is set.

use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::crash_monitor::{LogLevel, MonitorRuntime};
use crate::core::MonitorConfig;
use crate::platform::is_elevated;
use crate::ui::{run_headless, run_monitor_app, MonitorAppConfig};

const NOT_ELEVATED: &str =
    "Not running as administrator - some probes (event log, service files) may be limited";

/// Execute the monitor command
pub fn execute(matches: &ArgMatches, config: MonitorConfig) -> Result<()> {
    let headless = matches.get_flag("headless");

    if headless {
        crate::init_logging(None);
    } else {
        // Diagnostics must not draw over the alternate screen
        fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;
        let diagnostics = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_dir.join("diagnostics.log"))
            .context("Failed to open diagnostics log")?;
        crate::init_logging(Some(diagnostics));
    }

    log::info!(
        "Monitoring {} every {}ms, logs in {:?}",
        config.target.display_name,
        config.poll_interval_ms,
        config.log_dir
    );

    let app_config = MonitorAppConfig {
        target_name: config.target.display_name.clone(),
        service_name: config.security_service.display_name.clone(),
        autostart: matches.get_flag("autostart"),
        ..Default::default()
    };

    let runtime = MonitorRuntime::new(config).context("Failed to start crash monitor")?;

    if !is_elevated() {
        runtime.note(LogLevel::Warning, NOT_ELEVATED);
    }

    if headless {
        run_headless(runtime)
    } else {
        run_monitor_app(runtime, app_config).context("Failed to run crash monitor")
    }
}
