//! Terminal User Interface for the crash monitor.
//!
//! Renders the status projection and the activity log; sends start, stop
//! and clear commands. Never touches monitor state directly.

mod app;
mod event_handler;
mod render;
mod widgets;

pub use app::{run_monitor_app, MonitorApp, MonitorAppConfig};
pub use event_handler::MonitorEvent;
