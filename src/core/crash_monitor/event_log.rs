//! Recent application errors from the OS event log.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::EventLogConfig;
use crate::error::{CrashWatchError, Result};
use crate::platform::{parse_json_rows, windows};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// `None` if the OS handed back a timestamp we could not parse
    pub time: Option<DateTime<Local>>,
    pub source: String,
    pub message: String,
    pub event_id: i64,
}

/// Anything that can list error-level entries from a trailing time window.
pub trait EventLogSource: Send {
    fn query(&self, window: Duration) -> Result<Vec<EventLogEntry>>;
}

/// Application log, read through PowerShell `Get-EventLog`.
pub struct WindowsEventLog {
    max_entries: u32,
    timeout: Duration,
}

impl WindowsEventLog {
    pub fn new(config: &EventLogConfig) -> Self {
        Self {
            max_entries: config.max_entries,
            timeout: config.timeout(),
        }
    }
}

impl EventLogSource for WindowsEventLog {
    fn query(&self, window: Duration) -> Result<Vec<EventLogEntry>> {
        let minutes = (window.as_secs() / 60).max(1) as u32;
        let stdout = windows::query_application_errors(self.max_entries, minutes, self.timeout)?;
        parse_event_log_json(&stdout)
    }
}

/// Query `source`, degrading every failure to an empty list. `on_error`
/// sees the failure first.
pub fn recent_errors<F>(
    source: &dyn EventLogSource,
    window: Duration,
    on_error: F,
) -> Vec<EventLogEntry>
where
    F: FnOnce(&CrashWatchError),
{
    source.query(window).unwrap_or_else(|e| {
        log::warn!("Event log query failed: {}", e);
        on_error(&e);
        Vec::new()
    })
}

#[derive(Debug, Deserialize)]
struct RawEventRow {
    #[serde(rename = "TimeGenerated")]
    time_generated: Option<String>,
    #[serde(rename = "Source", default)]
    source: Option<String>,
    #[serde(rename = "Message", default)]
    message: Option<String>,
    #[serde(rename = "EventID", default)]
    event_id: Option<i64>,
}

pub fn parse_event_log_json(stdout: &str) -> Result<Vec<EventLogEntry>> {
    let rows: Vec<RawEventRow> = parse_json_rows(stdout)?;

    Ok(rows
        .into_iter()
        .map(|row| EventLogEntry {
            time: row.time_generated.as_deref().and_then(parse_event_time),
            source: row.source.unwrap_or_default(),
            message: row.message.unwrap_or_default(),
            event_id: row.event_id.unwrap_or_default(),
        })
        .collect())
}

/// Accepts RFC 3339 and the legacy `/Date(<millis>)/` JSON form.
fn parse_event_time(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Local));
    }

    let millis: i64 = raw
        .strip_prefix("/Date(")?
        .strip_suffix(")/")?
        .split(['+', '-'])
        .next()?
        .parse()
        .ok()?;

    Local.timestamp_millis_opt(millis).single()
}
