// UI and formatting module

pub mod console;
pub mod formatters;
pub mod monitor_tui;

// Re-export commonly used items for cleaner imports
pub use console::run_headless;
pub use formatters::{colorize_line, format_size, format_time, format_uptime};
pub use monitor_tui::{run_monitor_app, MonitorAppConfig};
