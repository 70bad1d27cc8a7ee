//! Headless presentation: colored activity lines on stdout until Ctrl+C.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use super::formatters::colorize_line;
use crate::core::crash_monitor::MonitorRuntime;

const DRAIN_INTERVAL: Duration = Duration::from_millis(200);

/// Start monitoring and print every activity line. Returns after Ctrl+C,
/// once the runtime has shut down.
pub fn run_headless(mut runtime: MonitorRuntime) -> Result<()> {
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_flag_clone = cancel_flag.clone();

    ctrlc::set_handler(move || {
        cancel_flag_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    println!("{}", "Press Ctrl+C to stop monitoring".dimmed());
    runtime.start();

    while !cancel_flag.load(Ordering::Relaxed) {
        for line in runtime.drain_logs() {
            println!("{}", colorize_line(&line));
        }
        thread::sleep(DRAIN_INTERVAL);
    }

    println!();
    let crashes = runtime.status().crash_count;
    runtime.stop();
    thread::sleep(DRAIN_INTERVAL);
    for line in runtime.drain_logs() {
        println!("{}", colorize_line(&line));
    }
    runtime.shutdown();

    let summary = format!("Session ended: {} crash(es) recorded", crashes);
    if crashes > 0 {
        println!("{}", summary.red().bold());
    } else {
        println!("{}", summary.green());
    }
    Ok(())
}
