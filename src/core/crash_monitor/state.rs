//! Running / not-running tracking for the target process.

use serde::{Deserialize, Serialize};

use super::snapshot::SystemSnapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonitorPhase {
    /// Not polling
    #[default]
    Idle,
    /// Polling, target process not present
    Absent,
    /// Polling, target process present
    Running,
}

/// What one observed snapshot did to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Absent -> Running
    Detected,
    /// Running -> Running
    StillRunning,
    /// Running -> Absent. `pre_crash` is the last good snapshot, if any.
    Crashed {
        crash_number: u32,
        pre_crash: Option<SystemSnapshot>,
    },
    /// Absent -> Absent, or any snapshot while idle
    NoChange,
}

/// Owned exclusively by the crash monitor.
#[derive(Debug, Default)]
pub struct MonitorState {
    phase: MonitorPhase,
    last_good: Option<SystemSnapshot>,
    crash_count: u32,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MonitorPhase {
        self.phase
    }

    pub fn crash_count(&self) -> u32 {
        self.crash_count
    }

    pub fn target_running(&self) -> bool {
        self.phase == MonitorPhase::Running
    }

    pub fn last_good(&self) -> Option<&SystemSnapshot> {
        self.last_good.as_ref()
    }

    /// Enter `Absent` with no last-good snapshot. The crash counter is kept.
    pub fn start(&mut self) {
        self.phase = MonitorPhase::Absent;
        self.last_good = None;
    }

    /// Stop polling. Counters and the last snapshot are left as they are.
    pub fn stop(&mut self) {
        self.phase = MonitorPhase::Idle;
    }

    pub fn observe(&mut self, snapshot: &SystemSnapshot) -> Transition {
        match (self.phase, snapshot.target_running()) {
            (MonitorPhase::Idle, _) => Transition::NoChange,
            (MonitorPhase::Absent, true) => {
                self.phase = MonitorPhase::Running;
                self.last_good = Some(snapshot.clone());
                Transition::Detected
            }
            (MonitorPhase::Running, true) => {
                self.last_good = Some(snapshot.clone());
                Transition::StillRunning
            }
            (MonitorPhase::Running, false) => {
                self.phase = MonitorPhase::Absent;
                self.crash_count += 1;
                Transition::Crashed {
                    crash_number: self.crash_count,
                    pre_crash: self.last_good.take(),
                }
            }
            (MonitorPhase::Absent, false) => Transition::NoChange,
        }
    }
}
