//! Tokio runtime that drives the crash monitor off the UI thread.
//!
//! One task owns the `CrashMonitor`. Each poll runs on the blocking pool:
//! the monitor is moved into the closure and handed back, so there is never
//! a second reference to it. The presentation shell only sees the status
//! projection (watch channel) and log lines (mpsc channel).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::activity_log::{ActivityLog, LogLevel, LogLine};
use super::event_log::{EventLogSource, WindowsEventLog};
use super::monitor::{CrashMonitor, MonitorStatus};
use super::probe::{SysinfoProbe, SystemProbe};
use crate::core::config::MonitorConfig;
use crate::error::{CrashWatchError, Result};

/// How long `shutdown` waits for an in-flight poll to finish
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorCommand {
    Start,
    Stop,
    /// Append a line to the activity log from outside the monitor
    Note(LogLevel, String),
    Shutdown,
}

pub struct MonitorRuntime {
    /// Latest status projection
    pub status_rx: watch::Receiver<Arc<MonitorStatus>>,

    log_rx: mpsc::UnboundedReceiver<LogLine>,
    command_tx: mpsc::UnboundedSender<MonitorCommand>,
    poll_handle: JoinHandle<()>,
    runtime: tokio::runtime::Runtime,
}

impl MonitorRuntime {
    /// Runtime over the real OS probes.
    pub fn new(config: MonitorConfig) -> Result<Self> {
        let probe = SysinfoProbe::new(&config);
        let events = WindowsEventLog::new(&config.event_log);
        Self::with_parts(config, Box::new(probe), Box::new(events))
    }

    pub fn with_parts(
        config: MonitorConfig,
        probe: Box<dyn SystemProbe>,
        events: Box<dyn EventLogSource>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .thread_name("crashwatch-monitor")
            .build()?;

        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let activity = ActivityLog::new(&config.log_dir)
            .map_err(|e| {
                CrashWatchError::monitor(format!(
                    "Cannot create log directory {:?}: {}",
                    config.log_dir, e
                ))
            })?
            .with_sink(log_tx);

        let poll_interval = config.poll_interval();
        let monitor = CrashMonitor::new(config, probe, events, activity)?;

        let (status_tx, status_rx) = watch::channel(Arc::new(monitor.status()));
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let poll_handle = runtime.spawn(poll_task(monitor, poll_interval, command_rx, status_tx));

        Ok(Self {
            status_rx,
            log_rx,
            command_tx,
            poll_handle,
            runtime,
        })
    }

    pub fn start(&self) {
        self.send(MonitorCommand::Start);
    }

    /// Takes effect at the next poll boundary.
    pub fn stop(&self) {
        self.send(MonitorCommand::Stop);
    }

    pub fn note(&self, level: LogLevel, message: impl Into<String>) {
        self.send(MonitorCommand::Note(level, message.into()));
    }

    pub fn status(&self) -> Arc<MonitorStatus> {
        self.status_rx.borrow().clone()
    }

    /// Log lines produced since the last call.
    pub fn drain_logs(&mut self) -> Vec<LogLine> {
        let mut lines = Vec::new();
        while let Ok(line) = self.log_rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    /// Stop monitoring and wait (bounded) for the poll task to exit.
    pub fn shutdown(self) {
        self.send(MonitorCommand::Shutdown);

        let poll_handle = self.poll_handle;
        let finished = self
            .runtime
            .block_on(async { tokio::time::timeout(SHUTDOWN_GRACE, poll_handle).await });
        if finished.is_err() {
            log::warn!("Poll task did not finish within {:?}", SHUTDOWN_GRACE);
        }

        self.runtime.shutdown_timeout(SHUTDOWN_GRACE);
    }

    fn send(&self, command: MonitorCommand) {
        if self.command_tx.send(command).is_err() {
            log::warn!("Monitor task is gone; command dropped");
        }
    }
}

/// Owns the monitor for its whole life. Commands are only looked at
/// between polls.
async fn poll_task(
    mut monitor: CrashMonitor,
    poll_interval: Duration,
    mut commands: mpsc::UnboundedReceiver<MonitorCommand>,
    status_tx: watch::Sender<Arc<MonitorStatus>>,
) {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !monitor.is_monitoring() {
                    continue;
                }
                monitor = match run_blocking(monitor, poll_once).await {
                    Some(monitor) => monitor,
                    None => break,
                };
            }
            command = commands.recv() => {
                match command {
                    Some(MonitorCommand::Start) => {
                        monitor = match run_blocking(monitor, CrashMonitor::start).await {
                            Some(monitor) => monitor,
                            None => break,
                        };
                        ticker.reset();
                    }
                    Some(MonitorCommand::Stop) => monitor.stop(),
                    Some(MonitorCommand::Note(level, message)) => monitor.note(level, message),
                    Some(MonitorCommand::Shutdown) | None => {
                        monitor.stop();
                        let _ = status_tx.send(Arc::new(monitor.status()));
                        break;
                    }
                }
            }
        }

        // watch::send() only fails if there are no receivers (which is fine)
        let _ = status_tx.send(Arc::new(monitor.status()));
    }
}

fn poll_once(monitor: &mut CrashMonitor) {
    if let Err(e) = monitor.poll() {
        monitor.note(LogLevel::Error, format!("Poll cycle failed: {}", e));
    }
}

/// Run `work` on the blocking pool and hand the monitor back. A panic in
/// `work` is logged and swallowed; `None` only if the pool itself failed.
async fn run_blocking<F>(mut monitor: CrashMonitor, work: F) -> Option<CrashMonitor>
where
    F: FnOnce(&mut CrashMonitor) + Send + 'static,
{
    let handle = tokio::task::spawn_blocking(move || {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| work(&mut monitor))) {
            monitor.note(
                LogLevel::Error,
                format!("Poll cycle failed: {}", panic_message(payload.as_ref())),
            );
        }
        monitor
    });

    match handle.await {
        Ok(monitor) => Some(monitor),
        Err(e) => {
            log::error!("Monitor task lost: {}", e);
            None
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
