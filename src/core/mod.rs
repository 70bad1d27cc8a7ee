// Core business logic module

pub mod config;
pub mod crash_monitor;

// Re-export commonly used items
pub use config::MonitorConfig;
pub use crash_monitor::{CrashMonitor, CrashReport, MonitorRuntime, SystemSnapshot};
