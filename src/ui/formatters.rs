use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};

use crate::core::crash_monitor::{LogLevel, LogLine};

/// Format file size in human-readable format (B, KB, MB, GB)
pub fn format_size(size: u64) -> String {
    if size < 1024 {
        format!("{}B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else if size < 1024 * 1024 * 1024 {
        format!("{:.1}MB", size as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1}GB", size as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Format timestamp in human-readable format (YYYY-MM-DD HH:MM:SS)
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format a process uptime as `1h 02m 03s`
pub fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Activity log line colored by level for console output
pub fn colorize_line(line: &LogLine) -> ColoredString {
    let text = line.render();
    match line.level {
        LogLevel::Info => text.green(),
        LogLevel::Warning => text.yellow(),
        LogLevel::Critical => text.red().bold(),
        LogLevel::Error => text.red(),
    }
}
