//! The crash-detection loop body: probe, track, and on a running ->
//! not-running edge analyze and persist a report.

use std::path::PathBuf;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::activity_log::{ActivityLog, LogLevel};
use super::analyzer::CrashAnalyzer;
use super::event_log::{recent_errors, EventLogSource, WindowsEventLog};
use super::probe::{SysinfoProbe, SystemProbe};
use super::report::{CrashReport, ReportStore};
use super::snapshot::SystemSnapshot;
use super::state::{MonitorPhase, MonitorState, Transition};
use crate::core::config::MonitorConfig;
use crate::error::{CrashWatchError, Result};

const BANNER_WIDTH: usize = 50;

/// Read-only projection handed to the presentation shell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorStatus {
    pub phase: MonitorPhase,
    pub target_running: bool,
    pub security_running: bool,
    pub security_installed: Option<bool>,
    pub gpu_name: Option<String>,
    pub cpu_percent: f32,
    pub ram_percent: f32,
    pub ram_used_gb: f64,
    pub crash_count: u32,
    pub last_report: Option<PathBuf>,
}

impl MonitorStatus {
    pub fn monitoring(&self) -> bool {
        self.phase != MonitorPhase::Idle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Monitor is stopped; nothing was probed
    Idle,
    Quiet,
    Detected,
    Crashed {
        crash_number: u32,
        report: Option<PathBuf>,
    },
}

pub struct CrashMonitor {
    config: MonitorConfig,
    probe: Box<dyn SystemProbe>,
    events: Box<dyn EventLogSource>,
    analyzer: CrashAnalyzer,
    reports: ReportStore,
    activity: ActivityLog,
    state: MonitorState,
    status: MonitorStatus,
}

impl CrashMonitor {
    /// Monitor backed by the real OS probes.
    pub fn from_config(config: MonitorConfig, activity: ActivityLog) -> Result<Self> {
        let probe = SysinfoProbe::new(&config);
        let events = WindowsEventLog::new(&config.event_log);
        Self::new(config, Box::new(probe), Box::new(events), activity)
    }

    pub fn new(
        config: MonitorConfig,
        probe: Box<dyn SystemProbe>,
        events: Box<dyn EventLogSource>,
        activity: ActivityLog,
    ) -> Result<Self> {
        let reports = ReportStore::new(&config.log_dir).map_err(|e| {
            CrashWatchError::monitor(format!(
                "Cannot use {:?} for crash reports: {}",
                config.log_dir, e
            ))
        })?;
        let analyzer = CrashAnalyzer::new(&config.security_service);

        Ok(Self {
            config,
            probe,
            events,
            analyzer,
            reports,
            activity,
            state: MonitorState::new(),
            status: MonitorStatus::default(),
        })
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn status(&self) -> MonitorStatus {
        self.status.clone()
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn is_monitoring(&self) -> bool {
        self.state.phase() != MonitorPhase::Idle
    }

    pub fn note(&self, level: LogLevel, message: impl Into<String>) {
        self.activity.write(level, message);
    }

    /// Enter `Absent` and log an initial system check. No-op if already
    /// monitoring.
    pub fn start(&mut self) {
        if self.is_monitoring() {
            return;
        }

        self.state.start();
        self.activity.info(format!(
            "Monitor started - waiting for {}...",
            self.config.target.display_name
        ));

        let snapshot = self.probe.snapshot();
        self.log_system_check(&snapshot);
        self.update_status(&snapshot);
    }

    pub fn stop(&mut self) {
        if !self.is_monitoring() {
            return;
        }

        self.state.stop();
        self.status.phase = MonitorPhase::Idle;
        // Nothing is observed while idle
        self.status.target_running = false;
        self.status.security_running = false;
        self.activity.warning("Monitoring stopped");
    }

    /// One poll cycle. An `Err` means the cycle's work was cut short; the
    /// state has still advanced and the next poll can proceed.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        if !self.is_monitoring() {
            return Ok(PollOutcome::Idle);
        }

        let snapshot = self.probe.snapshot();
        if snapshot.cpu_percent == 0.0 && snapshot.memory.percent == 0.0 {
            self.activity.warning("Probe returned zero CPU and RAM readings");
        }

        let outcome = match self.state.observe(&snapshot) {
            Transition::Detected => {
                self.log_detected(&snapshot);
                PollOutcome::Detected
            }
            Transition::StillRunning | Transition::NoChange => PollOutcome::Quiet,
            Transition::Crashed {
                crash_number,
                pre_crash,
            } => {
                self.update_status(&snapshot);
                return self.handle_crash(crash_number, pre_crash);
            }
        };

        self.update_status(&snapshot);
        Ok(outcome)
    }

    fn handle_crash(
        &mut self,
        crash_number: u32,
        pre_crash: Option<SystemSnapshot>,
    ) -> Result<PollOutcome> {
        let banner = "═".repeat(BANNER_WIDTH);
        self.activity.critical(banner.clone());
        self.activity.critical(format!("{} CRASHED!", self.config.target.display_name));
        self.activity.critical(banner.clone());

        let Some(pre_crash) = pre_crash else {
            self.activity.warning("No pre-crash snapshot was captured; no report written");
            return Ok(PollOutcome::Crashed {
                crash_number,
                report: None,
            });
        };

        let activity = &self.activity;
        let event_log_entries =
            recent_errors(self.events.as_ref(), self.config.event_window(), |e| {
                activity.warning(format!("Event log unavailable: {}", e))
            });

        let quick_analysis = self.analyzer.analyze(&pre_crash, &event_log_entries);

        self.activity.warning("Issues Found:");
        for issue in &quick_analysis.issues {
            self.activity.warning(format!("  {}", issue));
        }
        self.activity.info("Recommendations:");
        for rec in &quick_analysis.recommendations {
            self.activity.info(format!("  • {}", rec));
        }

        let report = CrashReport {
            crash_number,
            crash_time: Local::now(),
            pre_crash_snapshot: pre_crash,
            event_log_entries,
            quick_analysis,
        };

        let path = self.reports.save(&report).map_err(|e| {
            self.activity
                .error(format!("Failed to save crash report #{}: {}", crash_number, e));
            e
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.activity.info(format!("Full report saved: {}", file_name));
        self.activity.info(banner);

        self.status.last_report = Some(path.clone());
        Ok(PollOutcome::Crashed {
            crash_number,
            report: Some(path),
        })
    }

    fn log_system_check(&self, snapshot: &SystemSnapshot) {
        let service = &self.config.security_service.display_name;

        if let Some(gpu) = &snapshot.gpu_info {
            self.activity.info(format!("GPU: {}", gpu.name));
            self.activity.info(format!(
                "Driver: {}",
                gpu.driver_version.as_deref().unwrap_or("Unknown")
            ));
        }

        match &snapshot.security_install {
            Some(install) if install.installed => {
                let path = install
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.activity.info(format!("✓ {} installed: {}", service, path));
                if let Some(version) = &install.version {
                    self.activity.info(format!("  Version: {}", version));
                }
            }
            _ => self.activity.warning(format!("{} NOT installed!", service)),
        }

        if snapshot.hags_enabled == Some(true) {
            self.activity.warning("WARNING: HAGS is enabled - may cause crashes!");
        }

        self.activity.info(format!(
            "System: CPU {:.1}% | RAM {:.1}% ({:.1}GB used)",
            snapshot.cpu_percent, snapshot.memory.percent, snapshot.memory.used_gb
        ));
        self.activity.info("─".repeat(BANNER_WIDTH));
    }

    fn log_detected(&self, snapshot: &SystemSnapshot) {
        let banner = "═".repeat(BANNER_WIDTH);
        let service = &self.config.security_service.display_name;

        self.activity.info(banner.clone());
        self.activity.info(format!(
            "{} DETECTED - Monitoring active!",
            self.config.target.display_name
        ));
        self.activity.info(banner);

        if let Some(proc) = &snapshot.target_process {
            self.activity.info(format!("Process: {} (PID: {})", proc.name, proc.pid));
            self.activity.info(format!("Memory: {:.0}MB", proc.memory_mb));
        }

        match &snapshot.security_process {
            Some(ac) => self.activity.info(format!("✓ {}: {} running", service, ac.name)),
            None => self.activity.warning(format!("WARNING: {} NOT running!", service)),
        }

        if snapshot.hags_enabled == Some(true) {
            self.activity.warning("WARNING: HAGS is ENABLED - may cause crashes!");
        }
    }

    fn update_status(&mut self, snapshot: &SystemSnapshot) {
        let gpu_name = snapshot
            .gpu_info
            .as_ref()
            .map(|gpu| gpu.name.clone())
            .or_else(|| self.status.gpu_name.take());

        self.status = MonitorStatus {
            phase: self.state.phase(),
            target_running: snapshot.target_running(),
            security_running: snapshot.security_running(),
            security_installed: snapshot.security_install.as_ref().map(|i| i.installed),
            gpu_name,
            cpu_percent: snapshot.cpu_percent,
            ram_percent: snapshot.memory.percent,
            ram_used_gb: snapshot.memory.used_gb,
            crash_count: self.state.crash_count(),
            last_report: self.status.last_report.take(),
        };
    }
}
