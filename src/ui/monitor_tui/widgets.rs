use ratatui::prelude::*;

use crate::core::crash_monitor::{LogLevel, MonitorPhase, MonitorStatus};

/// Color for a CPU/RAM percentage
pub fn usage_color(percent: f32) -> Color {
    match percent {
        p if p > 90.0 => Color::Red,
        p if p > 70.0 => Color::Rgb(255, 191, 0), // amber
        _ => Color::Green,
    }
}

pub fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => Color::Green,
        LogLevel::Warning => Color::Yellow,
        LogLevel::Critical | LogLevel::Error => Color::Red,
    }
}

pub fn crash_count_color(count: u32) -> Color {
    if count > 0 {
        Color::Red
    } else {
        Color::Green
    }
}

/// Text and color for an on/off state
pub fn running_text(running: bool) -> (&'static str, Color) {
    if running {
        ("RUNNING", Color::Green)
    } else {
        ("NOT RUNNING", Color::Red)
    }
}

/// Game cell text: running state, or stopped when not monitoring
pub fn target_text(status: &MonitorStatus) -> (&'static str, Color) {
    if status.monitoring() {
        running_text(status.target_running)
    } else {
        ("Monitoring Stopped", Color::DarkGray)
    }
}

/// A `label: value` line for the status grid
pub fn status_line<'a>(label: &'a str, value: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}
