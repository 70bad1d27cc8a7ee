use std::fs;

use chrono::{Local, TimeZone};
use crashwatch::core::crash_monitor::{analyze, CrashReport, ReportStore};
use tempfile::TempDir;

use super::support::{entry, snapshot};

fn report(crash_number: u32) -> CrashReport {
    let pre_crash = snapshot(true);
    let events = vec![entry("Application Error", "Faulting module JavelinAC.dll")];
    let quick_analysis = analyze(&pre_crash, &events);

    CrashReport {
        crash_number,
        crash_time: Local.with_ymd_and_hms(2025, 10, 12, 21, 4, 59).unwrap(),
        pre_crash_snapshot: pre_crash,
        event_log_entries: events,
        quick_analysis,
    }
}

#[test]
fn test_report_file_name_uses_crash_time() {
    let temp_dir = TempDir::new().unwrap();
    let store = ReportStore::new(temp_dir.path()).unwrap();

    let path = store.save(&report(1)).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "crash_report_20251012_210459.json"
    );
}

#[test]
fn test_saved_report_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let store = ReportStore::new(temp_dir.path()).unwrap();
    let original = report(3);

    let path = store.save(&original).unwrap();
    let loaded = ReportStore::load(&path).unwrap();

    assert_eq!(loaded, original);
    assert!(loaded
        .quick_analysis
        .issues
        .contains(&"EA Javelin error detected".to_string()));
}

#[test]
fn test_report_json_field_names() {
    let temp_dir = TempDir::new().unwrap();
    let store = ReportStore::new(temp_dir.path()).unwrap();
    let path = store.save(&report(1)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    for key in [
        "crash_number",
        "crash_time",
        "pre_crash_snapshot",
        "event_log_entries",
        "quick_analysis",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value["quick_analysis"]["issues"].is_array());
    assert!(value["quick_analysis"]["recommendations"].is_array());
}

#[test]
fn test_same_second_crash_does_not_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let store = ReportStore::new(temp_dir.path()).unwrap();

    let first = store.save(&report(1)).unwrap();
    let second = store.save(&report(2)).unwrap();

    assert_ne!(first, second);
    assert_eq!(ReportStore::load(&first).unwrap().crash_number, 1);
    assert_eq!(ReportStore::load(&second).unwrap().crash_number, 2);
}

#[test]
fn test_list_only_returns_reports() {
    let temp_dir = TempDir::new().unwrap();
    let store = ReportStore::new(temp_dir.path()).unwrap();
    store.save(&report(1)).unwrap();
    fs::write(temp_dir.path().join("monitor_20251012.log"), "x").unwrap();
    fs::write(temp_dir.path().join("notes.json"), "{}").unwrap();

    let reports = store.list().unwrap();
    assert_eq!(reports.len(), 1);
}

#[test]
fn test_load_rejects_non_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("crash_report_bad.json");
    fs::write(&path, r#"{"hello": "world"}"#).unwrap();

    assert!(ReportStore::load(&path).is_err());
}
