//! Persisted crash reports: one pretty-printed JSON file per crash.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::analyzer::CrashAnalysis;
use super::event_log::EventLogEntry;
use super::snapshot::SystemSnapshot;
use crate::error::{CrashWatchError, Result};

const REPORT_PREFIX: &str = "crash_report_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashReport {
    pub crash_number: u32,
    pub crash_time: DateTime<Local>,
    pub pre_crash_snapshot: SystemSnapshot,
    pub event_log_entries: Vec<EventLogEntry>,
    pub quick_analysis: CrashAnalysis,
}

impl CrashReport {
    /// `crash_report_YYYYMMDD_HHMMSS`
    pub fn file_stem(&self) -> String {
        format!("{}{}", REPORT_PREFIX, self.crash_time.format("%Y%m%d_%H%M%S"))
    }
}

/// Directory of reports. Files are never overwritten.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `report` and return the file path. Two crashes in the same
    /// second get a `-<crash_number>` suffix on the second file.
    pub fn save(&self, report: &CrashReport) -> Result<PathBuf> {
        let stem = report.file_stem();
        let candidates = [
            self.dir.join(format!("{stem}.json")),
            self.dir.join(format!("{stem}-{}.json", report.crash_number)),
        ];

        for path in candidates {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_or_discard(&path, file, |writer| {
                        serde_json::to_writer_pretty(&mut *writer, report)?;
                        writer.flush()?;
                        Ok(())
                    })?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(CrashWatchError::report(format!(
            "A report named {stem} already exists in {:?}",
            self.dir
        )))
    }

    pub fn load(path: &Path) -> Result<CrashReport> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            CrashWatchError::report(format!("{:?} is not a crash report: {}", path, e))
        })
    }

    /// Report files in the directory, oldest first.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let mut reports: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "json")
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(REPORT_PREFIX))
            })
            .collect();

        reports.sort();
        Ok(reports)
    }
}

/// Run `write` against a freshly created file; on failure the partial file
/// is removed so it never shows up in `list`.
fn write_or_discard<F>(path: &Path, file: File, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut writer = BufWriter::new(file);
    let result = write(&mut writer);
    drop(writer);

    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Failed to remove partial report {:?}: {}", path, e);
        }
    }
    result
}
