use std::thread;
use std::time::{Duration, Instant};

use crashwatch::core::crash_monitor::{
    LogLevel, LogLine, MonitorPhase, MonitorRuntime, ReportStore,
};

use super::support::{temp_config, FakeEventLog, PanickingProbe, ScriptedProbe};

fn wait_until(runtime: &MonitorRuntime, mut done: impl FnMut(&MonitorRuntime) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if done(runtime) {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn test_runtime_detects_crash_and_publishes_status() {
    let (_temp_dir, config) = temp_config();
    let log_dir = config.log_dir.clone();
    let events = FakeEventLog::default();
    let probe = ScriptedProbe::from_presence(&[false, true, true, false]);

    let mut runtime =
        MonitorRuntime::with_parts(config, Box::new(probe), Box::new(events.clone())).unwrap();
    assert_eq!(runtime.status().phase, MonitorPhase::Idle);

    runtime.start();
    assert!(wait_until(&runtime, |rt| rt.status().crash_count == 1));

    let status = runtime.status();
    assert!(!status.target_running);
    assert_eq!(status.phase, MonitorPhase::Absent);
    assert!(status.last_report.is_some());
    assert_eq!(events.call_count(), 1);

    let lines = runtime.drain_logs();
    assert!(lines
        .iter()
        .any(|l| l.level == LogLevel::Critical && l.message == "BF6 CRASHED!"));

    runtime.shutdown();
    assert_eq!(ReportStore::new(&log_dir).unwrap().list().unwrap().len(), 1);
}

#[test]
fn test_runtime_stop_returns_to_idle_and_notes_are_logged() {
    let (_temp_dir, config) = temp_config();
    let probe = ScriptedProbe::from_presence(&[false]);

    let mut runtime =
        MonitorRuntime::with_parts(config, Box::new(probe), Box::new(FakeEventLog::default()))
            .unwrap();

    runtime.start();
    assert!(wait_until(&runtime, |rt| rt.status().monitoring()));

    runtime.stop();
    assert!(wait_until(&runtime, |rt| !rt.status().monitoring()));

    runtime.note(LogLevel::Info, "Log cleared");
    let mut seen = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline && !seen.iter().any(|l: &LogLine| l.message == "Log cleared") {
        seen.extend(runtime.drain_logs());
        thread::sleep(Duration::from_millis(10));
    }

    assert!(seen
        .iter()
        .any(|l| l.level == LogLevel::Warning && l.message == "Monitoring stopped"));
    assert!(seen
        .iter()
        .any(|l| l.level == LogLevel::Info && l.message == "Log cleared"));

    runtime.shutdown();
}

#[test]
fn test_panicking_poll_is_logged_and_monitoring_continues() {
    let (_temp_dir, config) = temp_config();
    // Calls: start check, detected, panic, absent -> crash
    let probe = PanickingProbe::new(ScriptedProbe::from_presence(&[false, true, false]), 3);

    let mut runtime =
        MonitorRuntime::with_parts(config, Box::new(probe), Box::new(FakeEventLog::default()))
            .unwrap();
    runtime.start();
    assert!(wait_until(&runtime, |rt| rt.status().crash_count == 1));
    assert!(runtime.status().monitoring());

    let lines = runtime.drain_logs();
    let failures: Vec<&LogLine> = lines
        .iter()
        .filter(|l| l.level == LogLevel::Error)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].message, "Poll cycle failed: sensor read exploded");
    assert!(failures[0].render().contains("[ERROR] Poll cycle failed"));

    runtime.shutdown();
}
