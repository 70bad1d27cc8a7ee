// Crashwatch Library - Public API

// Re-export error types
pub mod error;
pub use error::{CrashWatchError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::MonitorConfig;

use std::fs::File;

/// Initialize diagnostics logging. `RUST_LOG` overrides the default level.
///
/// With `pipe` set, records go to that file instead of stderr; the TUI uses
/// this so log output never lands on the alternate screen.
pub fn init_logging(pipe: Option<File>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Info)
        .parse_default_env();

    if let Some(file) = pipe {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // A second init (tests, repeated commands) is harmless.
    let _ = builder.try_init();
}
