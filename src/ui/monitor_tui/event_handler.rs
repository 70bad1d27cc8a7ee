/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Start monitoring
    Start,
    /// Stop monitoring
    Stop,
    /// Clear the activity log view
    ClearLog,
    /// Quit the application
    Quit,
    /// Toggle help overlay
    ToggleHelp,
    /// No action
    None,
}
