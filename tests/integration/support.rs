//! Scripted probe and event-log fakes shared by the integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crashwatch::core::crash_monitor::{
    EventLogEntry, EventLogSource, GpuInfo, GpuVendor, MemoryInfo, ProcessInfo, SystemProbe,
    SystemSnapshot,
};
use crashwatch::{CrashWatchError, MonitorConfig, Result};
use tempfile::TempDir;

pub fn snapshot(target_running: bool) -> SystemSnapshot {
    SystemSnapshot {
        timestamp: Local::now(),
        cpu_percent: 25.0,
        memory: MemoryInfo {
            total_gb: 32.0,
            available_gb: 16.0,
            used_gb: 16.0,
            percent: 50.0,
        },
        gpu_info: Some(GpuInfo {
            name: "AMD Radeon RX 7900 XTX".to_string(),
            driver_version: Some("31.0.24002.92".to_string()),
            vendor: GpuVendor::Amd,
        }),
        target_process: target_running.then(|| ProcessInfo {
            pid: 4242,
            name: "bf6.exe".to_string(),
            cpu_percent: 60.0,
            memory_mb: 9000.0,
            uptime_secs: 600,
        }),
        security_process: Some(ProcessInfo {
            pid: 1111,
            name: "EAAntiCheat.GameService.exe".to_string(),
            cpu_percent: 1.0,
            memory_mb: 50.0,
            uptime_secs: 700,
        }),
        security_install: None,
        hags_enabled: Some(false),
    }
}

/// Replays a fixed sequence, then keeps reporting the target as absent.
pub struct ScriptedProbe {
    script: VecDeque<SystemSnapshot>,
}

impl ScriptedProbe {
    pub fn new(script: Vec<SystemSnapshot>) -> Self {
        Self {
            script: script.into(),
        }
    }

    /// `true` = target present
    pub fn from_presence(presence: &[bool]) -> Self {
        Self::new(presence.iter().map(|&p| snapshot(p)).collect())
    }
}

impl SystemProbe for ScriptedProbe {
    fn snapshot(&mut self) -> SystemSnapshot {
        self.script.pop_front().unwrap_or_else(|| snapshot(false))
    }
}

/// Panics on the `panic_on`-th snapshot (1-based) without consuming the
/// script; every other call is delegated.
pub struct PanickingProbe {
    inner: ScriptedProbe,
    calls: usize,
    panic_on: usize,
}

impl PanickingProbe {
    pub fn new(inner: ScriptedProbe, panic_on: usize) -> Self {
        Self {
            inner,
            calls: 0,
            panic_on,
        }
    }
}

impl SystemProbe for PanickingProbe {
    fn snapshot(&mut self) -> SystemSnapshot {
        self.calls += 1;
        if self.calls == self.panic_on {
            panic!("sensor read exploded");
        }
        self.inner.snapshot()
    }
}

/// Event source that counts queries and returns canned entries.
#[derive(Clone, Default)]
pub struct FakeEventLog {
    pub calls: Arc<AtomicUsize>,
    pub entries: Vec<EventLogEntry>,
    pub fail: bool,
}

impl FakeEventLog {
    pub fn with_entries(entries: Vec<EventLogEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EventLogSource for FakeEventLog {
    fn query(&self, _window: Duration) -> Result<Vec<EventLogEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CrashWatchError::unsupported("event log"));
        }
        Ok(self.entries.clone())
    }
}

pub fn entry(source: &str, message: &str) -> EventLogEntry {
    EventLogEntry {
        time: Some(Local::now()),
        source: source.to_string(),
        message: message.to_string(),
        event_id: 1000,
    }
}

/// Default config writing into a fresh temp dir.
pub fn temp_config() -> (TempDir, MonitorConfig) {
    let temp_dir = TempDir::new().unwrap();
    let config = MonitorConfig {
        log_dir: temp_dir.path().join("crash_logs"),
        poll_interval_ms: 10,
        ..Default::default()
    };
    (temp_dir, config)
}
