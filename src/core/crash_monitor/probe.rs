//! Instantaneous OS state: CPU/memory, GPU identity, processes, the
//! security-service install and the hardware scheduling flag.
//!
//! Every sub-probe degrades to `None` on failure; a snapshot is always
//! produced.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::Local;
use sysinfo::{
    CpuRefreshKind, MemoryRefreshKind, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System,
};

use super::snapshot::{
    GpuInfo, GpuVendor, MemoryInfo, ProcessInfo, SecurityInstall, SystemSnapshot,
};
use crate::core::config::MonitorConfig;
use crate::platform::windows::{self, VideoController};

/// Blocking sample used when the first non-blocking read comes back as 0%
const CPU_FALLBACK_SAMPLE: Duration = Duration::from_secs(1);

const NVIDIA_MARKERS: &[&str] = &["NVIDIA", "GeForce", "RTX", "GTX"];
const AMD_MARKERS: &[&str] = &["AMD", "Radeon"];

pub trait SystemProbe: Send {
    fn snapshot(&mut self) -> SystemSnapshot;
}

/// Probe backed by `sysinfo` plus the Windows platform helpers.
pub struct SysinfoProbe {
    system: System,
    target_names: Vec<String>,
    security_names: Vec<String>,
    install_dir: PathBuf,
    service_executable: String,
    version_timeout: Duration,
    /// Outcome of the one version lookup per session, `Some(None)` included
    service_version: Option<Option<String>>,
}

impl SysinfoProbe {
    pub fn new(config: &MonitorConfig) -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        // Starts the CPU accounting window so the first poll has a baseline.
        let system = System::new_with_specifics(refresh_kind);

        Self {
            system,
            target_names: config.target.process_names.clone(),
            security_names: config.security_service.process_names.clone(),
            install_dir: config.security_service.install_dir.clone(),
            service_executable: config.security_service.service_executable.clone(),
            version_timeout: config.version_timeout(),
            service_version: None,
        }
    }

    fn sample_cpu(&mut self) -> f32 {
        self.system.refresh_cpu_usage();
        let usage = self.system.global_cpu_usage();
        if usage != 0.0 {
            return usage;
        }

        // A zero here is almost always a cold accounting window.
        thread::sleep(CPU_FALLBACK_SAMPLE.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu_usage();
        self.system.global_cpu_usage()
    }

    fn sample_memory(&mut self) -> MemoryInfo {
        self.system.refresh_memory();
        MemoryInfo::from_bytes(
            self.system.total_memory(),
            self.system.available_memory(),
            self.system.used_memory(),
        )
    }

    fn list_processes(&mut self) -> Vec<ProcessInfo> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        self.system
            .processes()
            .values()
            .map(|proc| ProcessInfo {
                pid: proc.pid().as_u32(),
                name: proc.name().to_string_lossy().to_string(),
                cpu_percent: proc.cpu_usage(),
                memory_mb: proc.memory() as f64 / 1024.0 / 1024.0,
                uptime_secs: proc.run_time(),
            })
            .collect()
    }

    fn security_install(&mut self) -> SecurityInstall {
        let cached = &mut self.service_version;
        let timeout = self.version_timeout;

        probe_security_install(&self.install_dir, &self.service_executable, |path| {
            cached_lookup(cached, || lookup_file_version(path, timeout))
        })
    }
}

impl SystemProbe for SysinfoProbe {
    fn snapshot(&mut self) -> SystemSnapshot {
        let cpu_percent = self.sample_cpu();
        let memory = self.sample_memory();
        let processes = self.list_processes();

        SystemSnapshot {
            timestamp: Local::now(),
            cpu_percent,
            memory,
            gpu_info: probe_gpu(),
            target_process: select_process(&processes, &self.target_names),
            security_process: select_process(&processes, &self.security_names),
            security_install: Some(self.security_install()),
            hags_enabled: probe_hags(),
        }
    }
}

/// First process matching a candidate name, case-insensitively.
///
/// Candidates are tried in order, so an earlier name wins even if a later
/// one appears first in the process table.
pub fn select_process(processes: &[ProcessInfo], candidates: &[String]) -> Option<ProcessInfo> {
    candidates.iter().find_map(|candidate| {
        processes
            .iter()
            .find(|proc| proc.name.eq_ignore_ascii_case(candidate))
            .cloned()
    })
}

/// Vendor implied by case-sensitive name markers, if any.
pub fn vendor_from_name(name: &str) -> Option<GpuVendor> {
    if NVIDIA_MARKERS.iter().any(|marker| name.contains(marker)) {
        Some(GpuVendor::Nvidia)
    } else if AMD_MARKERS.iter().any(|marker| name.contains(marker)) {
        Some(GpuVendor::Amd)
    } else {
        None
    }
}

/// Pick the GPU to report: the first AMD/NVIDIA controller, otherwise
/// the first real adapter tagged `Unknown`.
pub fn select_gpu(controllers: &[VideoController]) -> Option<GpuInfo> {
    let known = controllers.iter().find_map(|controller| {
        vendor_from_name(&controller.name).map(|vendor| GpuInfo {
            name: controller.name.clone(),
            driver_version: controller.driver_version.clone(),
            vendor,
        })
    });

    known.or_else(|| {
        controllers
            .iter()
            .find(|c| !c.name.contains("Basic Display") && !c.name.contains("Microsoft Basic"))
            .map(|controller| {
                log::debug!("No AMD/NVIDIA marker in GPU name: {}", controller.name);
                GpuInfo {
                    name: controller.name.clone(),
                    driver_version: controller.driver_version.clone(),
                    vendor: GpuVendor::Unknown,
                }
            })
    })
}

fn probe_gpu() -> Option<GpuInfo> {
    match windows::get_video_controllers() {
        Ok(controllers) => select_gpu(&controllers),
        Err(e) => {
            log::debug!("GPU probe unavailable: {}", e);
            None
        }
    }
}

fn probe_hags() -> Option<bool> {
    windows::hardware_scheduling_enabled().unwrap_or_else(|e| {
        log::debug!("HAGS probe unavailable: {}", e);
        None
    })
}

/// Run `lookup` at most once; a failed or empty lookup is remembered too.
fn cached_lookup<F>(cache: &mut Option<Option<String>>, lookup: F) -> Option<String>
where
    F: FnOnce() -> Option<String>,
{
    cache.get_or_insert_with(lookup).clone()
}

fn lookup_file_version(path: &Path, timeout: Duration) -> Option<String> {
    windows::get_file_version(path, timeout).unwrap_or_else(|e| {
        log::warn!("Version lookup for {:?} failed: {}", path, e);
        None
    })
}

/// Installation check for the security service. `version_of` is only
/// consulted when the service executable exists.
pub fn probe_security_install<F>(
    install_dir: &Path,
    service_executable: &str,
    version_of: F,
) -> SecurityInstall
where
    F: FnOnce(&Path) -> Option<String>,
{
    if !install_dir.exists() {
        return SecurityInstall::default();
    }

    let service_path = install_dir.join(service_executable);
    let service_exists = service_path.exists();

    let version = if service_exists {
        version_of(&service_path)
    } else {
        None
    };

    SecurityInstall {
        installed: true,
        path: Some(install_dir.to_path_buf()),
        version,
        service_exists,
    }
}
