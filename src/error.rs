use std::io;
use std::time::Duration;
use thiserror::Error;

/// Custom error type for crashwatch
#[derive(Error, Debug)]
pub enum CrashWatchError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Command timed out after {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },

    #[error("WMI error: {0}")]
    Wmi(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("Monitor error: {0}")]
    Monitor(String),

    #[error("{0}")]
    Unsupported(String),
}

/// Result type alias for crashwatch
pub type Result<T> = std::result::Result<T, CrashWatchError>;

impl CrashWatchError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Config(msg.into())
    }

    /// Create an external command error
    pub fn command<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Command(msg.into())
    }

    pub fn timeout<S: Into<String>>(command: S, timeout: Duration) -> Self {
        CrashWatchError::Timeout {
            command: command.into(),
            timeout,
        }
    }

    pub fn wmi<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Wmi(msg.into())
    }

    pub fn registry<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Registry(msg.into())
    }

    pub fn report<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Report(msg.into())
    }

    pub fn monitor<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Monitor(msg.into())
    }

    /// Create an error for probes that only exist on another platform
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        CrashWatchError::Unsupported(msg.into())
    }
}
