// Platform-specific code module

pub mod command;
pub mod elevation;
pub mod windows;

// Re-exports para imports limpios
pub use command::{parse_json_rows, run_powershell, run_with_timeout};
pub use elevation::is_elevated;
