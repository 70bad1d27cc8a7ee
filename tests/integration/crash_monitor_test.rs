use std::fs;

use crashwatch::core::crash_monitor::{
    ActivityLog, CrashMonitor, LogLevel, MonitorPhase, PollOutcome, ReportStore,
};
use tokio::sync::mpsc;
use crashwatch::MonitorConfig;
use tempfile::TempDir;

use super::support::{entry, snapshot, temp_config, FakeEventLog, ScriptedProbe};

fn monitor_with(
    config: &MonitorConfig,
    probe: ScriptedProbe,
    events: FakeEventLog,
) -> CrashMonitor {
    let activity = ActivityLog::new(&config.log_dir).unwrap();
    CrashMonitor::new(config.clone(), Box::new(probe), Box::new(events), activity).unwrap()
}

/// Start, then poll `polls` times; collects every outcome.
fn run(monitor: &mut CrashMonitor, polls: usize) -> Vec<PollOutcome> {
    monitor.start();
    (0..polls).map(|_| monitor.poll().unwrap()).collect()
}

fn activity_text(config: &MonitorConfig) -> String {
    let mut text = String::new();
    for entry in fs::read_dir(&config.log_dir).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if name.starts_with("monitor_") {
            text.push_str(&fs::read_to_string(path).unwrap());
        }
    }
    text
}

#[test]
fn test_present_present_absent_writes_one_report() {
    let (_temp_dir, config) = temp_config();
    let events = FakeEventLog::with_entries(vec![entry("Display", "amdkmdag stopped responding")]);
    // First snapshot is consumed by the start-up system check
    let probe = ScriptedProbe::from_presence(&[false, true, true, false]);
    let mut monitor = monitor_with(&config, probe, events.clone());

    let outcomes = run(&mut monitor, 3);
    assert_eq!(outcomes[0], PollOutcome::Detected);
    assert_eq!(outcomes[1], PollOutcome::Quiet);

    let PollOutcome::Crashed { crash_number, report } = &outcomes[2] else {
        panic!("expected a crash, got {:?}", outcomes[2]);
    };
    assert_eq!(*crash_number, 1);
    assert_eq!(events.call_count(), 1);

    let store = ReportStore::new(&config.log_dir).unwrap();
    let reports = store.list().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(report.as_ref(), Some(&reports[0]));

    let saved = ReportStore::load(&reports[0]).unwrap();
    assert_eq!(saved.crash_number, 1);
    assert!(saved.pre_crash_snapshot.target_running());
    assert_eq!(saved.event_log_entries.len(), 1);
    assert!(saved
        .quick_analysis
        .issues
        .contains(&"No obvious issues detected".to_string()));

    assert_eq!(monitor.state().crash_count(), 1);
    assert_eq!(monitor.state().phase(), MonitorPhase::Absent);
    assert_eq!(monitor.status().last_report, report.clone());
}

#[test]
fn test_second_crash_gets_next_number() {
    let (_temp_dir, config) = temp_config();
    let probe = ScriptedProbe::from_presence(&[false, true, false, false, true, false]);
    let mut monitor = monitor_with(&config, probe, FakeEventLog::default());

    let outcomes = run(&mut monitor, 5);
    let numbers: Vec<u32> = outcomes
        .iter()
        .filter_map(|o| match o {
            PollOutcome::Crashed { crash_number, .. } => Some(*crash_number),
            _ => None,
        })
        .collect();

    assert_eq!(numbers, vec![1, 2]);
    assert_eq!(monitor.status().crash_count, 2);
}

#[test]
fn test_never_running_never_queries_event_log() {
    let (_temp_dir, config) = temp_config();
    let events = FakeEventLog::default();
    let probe = ScriptedProbe::from_presence(&[false, false, false]);
    let mut monitor = monitor_with(&config, probe, events.clone());

    let outcomes = run(&mut monitor, 2);
    assert!(outcomes.iter().all(|o| *o == PollOutcome::Quiet));
    assert_eq!(events.call_count(), 0);
    assert!(ReportStore::new(&config.log_dir).unwrap().list().unwrap().is_empty());
}

#[test]
fn test_event_log_failure_still_writes_report() {
    let (_temp_dir, config) = temp_config();
    let probe = ScriptedProbe::from_presence(&[false, true, false]);
    let mut monitor = monitor_with(&config, probe, FakeEventLog::failing());

    let outcomes = run(&mut monitor, 2);
    assert!(matches!(
        outcomes[1],
        PollOutcome::Crashed { crash_number: 1, report: Some(_) }
    ));

    let reports = ReportStore::new(&config.log_dir).unwrap().list().unwrap();
    let saved = ReportStore::load(&reports[0]).unwrap();
    assert!(saved.event_log_entries.is_empty());
    assert!(activity_text(&config).contains("[WARNING] Event log unavailable"));
}

#[test]
fn test_poll_while_idle_does_nothing() {
    let (_temp_dir, config) = temp_config();
    let events = FakeEventLog::default();
    let probe = ScriptedProbe::from_presence(&[true, false]);
    let mut monitor = monitor_with(&config, probe, events.clone());

    assert_eq!(monitor.poll().unwrap(), PollOutcome::Idle);
    assert!(!monitor.is_monitoring());
    assert_eq!(monitor.state().crash_count(), 0);
}

#[test]
fn test_stop_then_start_does_not_report_stale_run() {
    let (_temp_dir, config) = temp_config();
    let events = FakeEventLog::default();
    // start check, present, [stop], start check, absent
    let probe = ScriptedProbe::from_presence(&[false, true, false, false]);
    let mut monitor = monitor_with(&config, probe, events.clone());

    monitor.start();
    assert_eq!(monitor.poll().unwrap(), PollOutcome::Detected);
    assert!(monitor.status().target_running);
    monitor.stop();
    assert!(!monitor.is_monitoring());
    assert!(!monitor.status().target_running);
    assert!(!monitor.status().security_running);

    monitor.start();
    assert_eq!(monitor.poll().unwrap(), PollOutcome::Quiet);
    assert_eq!(events.call_count(), 0);
    assert_eq!(monitor.state().crash_count(), 0);
}

#[test]
fn test_activity_log_records_lifecycle() {
    let (_temp_dir, config) = temp_config();
    let probe = ScriptedProbe::from_presence(&[false, true, false]);
    let mut monitor = monitor_with(&config, probe, FakeEventLog::default());

    run(&mut monitor, 2);
    monitor.stop();

    let text = activity_text(&config);
    assert!(text.contains("[INFO] Monitor started - waiting for BF6..."));
    assert!(text.contains("[INFO] BF6 DETECTED - Monitoring active!"));
    assert!(text.contains("[CRITICAL] BF6 CRASHED!"));
    assert!(text.contains("[INFO] Full report saved: crash_report_"));
    assert!(text.contains("[WARNING] Monitoring stopped"));
}

#[test]
fn test_zero_reading_emits_warning() {
    let (_temp_dir, config) = temp_config();
    let mut zero = snapshot(false);
    zero.cpu_percent = 0.0;
    zero.memory.percent = 0.0;
    let probe = ScriptedProbe::new(vec![snapshot(false), zero]);
    let mut monitor = monitor_with(&config, probe, FakeEventLog::default());

    run(&mut monitor, 1);
    assert!(activity_text(&config).contains("[WARNING] Probe returned zero CPU and RAM readings"));
}

#[test]
fn test_unwritable_log_dir_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("not_a_dir");
    fs::write(&blocker, "file").unwrap();

    assert!(ActivityLog::new(blocker.join("logs")).is_err());
}

#[test]
fn test_failed_report_write_does_not_stop_monitoring() {
    let (temp_dir, config) = temp_config();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let activity = ActivityLog::new(temp_dir.path().join("activity"))
        .unwrap()
        .with_sink(tx);
    let events = FakeEventLog::default();
    let probe = ScriptedProbe::from_presence(&[false, true, false, true, false]);
    let mut monitor = CrashMonitor::new(
        config.clone(),
        Box::new(probe),
        Box::new(events.clone()),
        activity,
    )
    .unwrap();

    monitor.start();
    assert_eq!(monitor.poll().unwrap(), PollOutcome::Detected);

    // Report directory turns into a plain file
    fs::remove_dir_all(&config.log_dir).unwrap();
    fs::write(&config.log_dir, "not a directory").unwrap();

    assert!(monitor.poll().is_err());
    assert_eq!(monitor.state().crash_count(), 1);
    assert!(monitor.is_monitoring());

    let mut errors = Vec::new();
    while let Ok(line) = rx.try_recv() {
        if line.level == LogLevel::Error {
            errors.push(line.message);
        }
    }
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to save crash report #1"));

    // Next poll proceeds normally
    assert_eq!(monitor.poll().unwrap(), PollOutcome::Detected);

    fs::remove_file(&config.log_dir).unwrap();
    fs::create_dir_all(&config.log_dir).unwrap();
    let outcome = monitor.poll().unwrap();
    assert!(matches!(
        outcome,
        PollOutcome::Crashed { crash_number: 2, report: Some(_) }
    ));
    assert_eq!(events.call_count(), 2);
}
