//! Crash detection core.
//!
//! Probe -> state machine -> (on crash) event log + analyzer -> report.
//! The presentation shell talks to it only through `MonitorRuntime`.

pub mod activity_log;
pub mod analyzer;
pub mod event_log;
mod monitor;
pub mod probe;
pub mod report;
mod runtime;
pub mod snapshot;
pub mod state;

pub use activity_log::{ActivityLog, LogLevel, LogLine};
pub use analyzer::{analyze, CrashAnalysis, CrashAnalyzer};
pub use event_log::{recent_errors, EventLogEntry, EventLogSource, WindowsEventLog};
pub use monitor::{CrashMonitor, MonitorStatus, PollOutcome};
pub use probe::{SysinfoProbe, SystemProbe};
pub use report::{CrashReport, ReportStore};
pub use runtime::{MonitorCommand, MonitorRuntime};
pub(crate) use runtime::panic_message;
pub use snapshot::{GpuInfo, GpuVendor, MemoryInfo, ProcessInfo, SecurityInstall, SystemSnapshot};
pub use state::{MonitorPhase, MonitorState, Transition};
