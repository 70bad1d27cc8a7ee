//! Operator-facing activity stream: `[HH:MM:SS] [LEVEL] message` lines,
//! appended to a daily file and forwarded to the presentation shell.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warning,
    Critical,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Error => "ERROR",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            level,
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("[{}] [{}] {}", self.time.format("%H:%M:%S"), self.level, self.message)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

pub struct ActivityLog {
    dir: PathBuf,
    sink: Option<mpsc::UnboundedSender<LogLine>>,
}

impl ActivityLog {
    /// Fails if the log directory cannot be created; the monitor must not
    /// start in that case.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, sink: None })
    }

    /// Also forward every line to `sink`.
    pub fn with_sink(mut self, sink: mpsc::UnboundedSender<LogLine>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn file_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("monitor_{}.log", date.format("%Y%m%d")))
    }

    pub fn info(&self, message: impl Into<String>) {
        self.write(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.write(LogLevel::Warning, message);
    }

    pub fn critical(&self, message: impl Into<String>) {
        self.write(LogLevel::Critical, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.write(LogLevel::Error, message);
    }

    pub fn write(&self, level: LogLevel, message: impl Into<String>) {
        self.push(LogLine::new(level, message));
    }

    fn push(&self, line: LogLine) {
        let path = self.file_for(line.time.date_naive());
        if let Err(e) = append_line(&path, &line.render()) {
            log::warn!("Failed to append to {:?}: {}", path, e);
        }

        if let Some(sink) = &self.sink {
            // A closed receiver just means nobody is watching.
            let _ = sink.send(line);
        }
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)
}
