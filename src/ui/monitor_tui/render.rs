use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::app::MonitorApp;
use super::widgets::{
    crash_count_color, level_color, running_text, status_line, target_text, usage_color,
};
use crate::core::crash_monitor::MonitorPhase;

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &MonitorApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(5), // Status grid
            Constraint::Length(3), // Controls
            Constraint::Min(5),    // Activity log
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_title(frame, chunks[0], app);
    render_status_grid(frame, chunks[1], app);
    render_controls(frame, chunks[2], app);
    render_log_panel(frame, chunks[3], app);
    render_footer(frame, chunks[4], app);

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let (state, color) = match app.status.phase {
        MonitorPhase::Idle => ("STOPPED", Color::DarkGray),
        MonitorPhase::Absent => ("WAITING", Color::Yellow),
        MonitorPhase::Running => ("MONITORING", Color::Green),
    };

    let title = Line::from(vec![
        Span::styled(
            format!(" {} Crash Monitor ", app.target_name),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ]);

    let para = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn render_status_grid(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let status = &app.status;

    let block = Block::default().title(" Status ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(inner);

    let (game_text, game_color) = target_text(status);
    let (service_text, service_color) = match status.security_installed {
        Some(false) => ("NOT INSTALLED", Color::Red),
        _ => running_text(status.security_running),
    };

    let cells = [
        [
            status_line(&app.target_name, game_text.to_string(), game_color),
            status_line(
                "GPU",
                status.gpu_name.clone().unwrap_or_else(|| "Unknown".to_string()),
                Color::White,
            ),
        ],
        [
            status_line(&app.service_name, service_text.to_string(), service_color),
            status_line(
                "CPU",
                format!("{:.1}%", status.cpu_percent),
                usage_color(status.cpu_percent),
            ),
        ],
        [
            status_line(
                "Crashes",
                status.crash_count.to_string(),
                crash_count_color(status.crash_count),
            ),
            status_line(
                "RAM",
                format!("{:.1}% ({:.1}GB)", status.ram_percent, status.ram_used_gb),
                usage_color(status.ram_percent),
            ),
        ],
    ];

    for (column, lines) in columns.iter().zip(cells) {
        frame.render_widget(Paragraph::new(lines.to_vec()), *column);
    }
}

fn render_controls(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let enabled = Style::default().fg(Color::Black).bg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);
    let monitoring = app.status.monitoring();

    let line = Line::from(vec![
        Span::styled(" [s] Start ", if monitoring { disabled } else { enabled }),
        Span::raw("   "),
        Span::styled(" [x] Stop ", if monitoring { enabled } else { disabled }),
        Span::raw("   "),
        Span::styled(" [c] Clear Log ", enabled),
    ]);

    let para = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(para, area);
}

fn render_log_panel(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let block = Block::default().title(" Activity Log ").borders(Borders::ALL);
    let visible = block.inner(area).height as usize;

    // Tail of the buffer that fits the panel
    let skip = app.log_lines.len().saturating_sub(visible);
    let lines: Vec<Line> = app
        .log_lines
        .iter()
        .skip(skip)
        .map(|line| {
            Line::styled(line.render(), Style::default().fg(level_color(line.level)))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let para = if app.confirm_quit {
        Paragraph::new(" Monitoring is active. Press q again to quit, any other key to cancel ")
            .style(Style::default().fg(Color::Yellow))
    } else {
        Paragraph::new(" q: Quit │ ?: Help │ s: Start │ x: Stop │ c: Clear log ")
            .style(Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(para, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let help_text = format!(
        r#"
    {} Crash Monitor - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    s / Enter   Start monitoring
    x / p       Stop monitoring
    c           Clear the log view
    q / Esc     Quit the application
    ? / h       Toggle this help screen

    Reports are written to the log directory
    when {} exits while monitored.

    Press any key to close this help
    "#,
        app.target_name, app.target_name
    );

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    // Center the help popup
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
