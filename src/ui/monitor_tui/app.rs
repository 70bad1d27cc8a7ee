use std::collections::VecDeque;
use std::io;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::crash_monitor::{
    panic_message, LogLevel, LogLine, MonitorCommand, MonitorRuntime, MonitorStatus,
};

use super::event_handler::MonitorEvent;
use super::render::render_ui;

/// Lines kept in the on-screen log view
const LOG_VIEW_CAPACITY: usize = 1000;

/// Monitor application state
pub struct MonitorApp {
    pub status: Arc<MonitorStatus>,
    pub log_lines: VecDeque<LogLine>,
    pub target_name: String,
    pub service_name: String,
    pub should_quit: bool,
    /// Set after a first quit request while monitoring
    pub confirm_quit: bool,
    pub show_help: bool,
}

impl MonitorApp {
    pub fn new(config: &MonitorAppConfig) -> Self {
        Self {
            status: Arc::new(MonitorStatus::default()),
            log_lines: VecDeque::with_capacity(LOG_VIEW_CAPACITY),
            target_name: config.target_name.clone(),
            service_name: config.service_name.clone(),
            should_quit: false,
            confirm_quit: false,
            show_help: false,
        }
    }

    pub fn push_lines(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        for line in lines {
            if self.log_lines.len() == LOG_VIEW_CAPACITY {
                self.log_lines.pop_front();
            }
            self.log_lines.push_back(line);
        }
    }

    /// Apply a key event; returns the command to forward to the monitor.
    pub fn handle_event(&mut self, event: MonitorEvent) -> Option<MonitorCommand> {
        if event != MonitorEvent::Quit {
            self.confirm_quit = false;
        }

        match event {
            MonitorEvent::Start if !self.status.monitoring() => Some(MonitorCommand::Start),
            MonitorEvent::Stop if self.status.monitoring() => Some(MonitorCommand::Stop),
            MonitorEvent::ClearLog => {
                self.log_lines.clear();
                Some(MonitorCommand::Note(LogLevel::Info, "Log cleared".to_string()))
            }
            MonitorEvent::Quit => {
                if self.status.monitoring() && !self.confirm_quit {
                    self.confirm_quit = true;
                } else {
                    self.should_quit = true;
                }
                None
            }
            MonitorEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            MonitorEvent::Start | MonitorEvent::Stop | MonitorEvent::None => None,
        }
    }
}

/// Configuration for the monitor app
#[derive(Debug, Clone)]
pub struct MonitorAppConfig {
    pub refresh_ms: u64,
    pub target_name: String,
    pub service_name: String,
    /// Send `Start` as soon as the UI is up
    pub autostart: bool,
}

impl Default for MonitorAppConfig {
    fn default() -> Self {
        Self {
            refresh_ms: 250,
            target_name: "Game".to_string(),
            service_name: "Security service".to_string(),
            autostart: false,
        }
    }
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Sends panic reports to the diagnostics log while the TUI owns the
/// terminal. The previous hook is restored on drop.
struct PanicToLog {
    previous: Option<PanicHook>,
}

impl PanicToLog {
    fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(log_panic));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for PanicToLog {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

fn log_panic(info: &PanicHookInfo<'_>) {
    let location = info
        .location()
        .map(|loc| format!("{}:{}", loc.file(), loc.line()))
        .unwrap_or_else(|| "unknown location".to_string());
    log::error!("panic at {}: {}", location, panic_message(info.payload()));
}

/// Run the monitor TUI until the user quits, then shut the runtime down.
pub fn run_monitor_app(mut runtime: MonitorRuntime, config: MonitorAppConfig) -> Result<()> {
    let _panic_guard = PanicToLog::install();

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = MonitorApp::new(&config);
    let tick_rate = Duration::from_millis(config.refresh_ms);

    if config.autostart {
        runtime.start();
    }

    let result = event_loop(&mut terminal, &mut app, &mut runtime, tick_rate);

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    runtime.shutdown();
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
    runtime: &mut MonitorRuntime,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        app.status = runtime.status();
        app.push_lines(runtime.drain_logs());

        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(tick_rate).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    let monitor_event = if app.show_help {
                        // Any key closes the help overlay
                        MonitorEvent::ToggleHelp
                    } else {
                        match key.code {
                            KeyCode::Char('s') | KeyCode::Enter => MonitorEvent::Start,
                            KeyCode::Char('x') | KeyCode::Char('p') => MonitorEvent::Stop,
                            KeyCode::Char('c') => MonitorEvent::ClearLog,
                            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
                            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
                            _ => MonitorEvent::None,
                        }
                    };

                    if let Some(command) = app.handle_event(monitor_event) {
                        match command {
                            MonitorCommand::Start => runtime.start(),
                            MonitorCommand::Stop => runtime.stop(),
                            MonitorCommand::Note(level, message) => runtime.note(level, message),
                            MonitorCommand::Shutdown => app.should_quit = true,
                        }
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
