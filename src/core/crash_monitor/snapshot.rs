//! Point-in-time system health records.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One poll's view of the machine. Built once by the probe, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: f32,
    pub memory: MemoryInfo,
    pub gpu_info: Option<GpuInfo>,
    pub target_process: Option<ProcessInfo>,
    pub security_process: Option<ProcessInfo>,
    pub security_install: Option<SecurityInstall>,
    /// `None` when the OS does not expose the setting
    pub hags_enabled: Option<bool>,
}

impl SystemSnapshot {
    pub fn target_running(&self) -> bool {
        self.target_process.is_some()
    }

    pub fn security_running(&self) -> bool {
        self.security_process.is_some()
    }

    pub fn gpu_vendor(&self) -> GpuVendor {
        self.gpu_info
            .as_ref()
            .map(|gpu| gpu.vendor)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_gb: f64,
    pub available_gb: f64,
    pub used_gb: f64,
    pub percent: f32,
}

impl MemoryInfo {
    pub fn from_bytes(total: u64, available: u64, used: u64) -> Self {
        const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

        let percent = if total > 0 {
            (total.saturating_sub(available) as f64 / total as f64 * 100.0) as f32
        } else {
            0.0
        };

        Self {
            total_gb: total as f64 / GIB,
            available_gb: available as f64 / GIB,
            used_gb: used as f64 / GIB,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GpuVendor {
    #[serde(rename = "AMD")]
    Amd,
    #[serde(rename = "NVIDIA")]
    Nvidia,
    #[default]
    Unknown,
}

impl fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuVendor::Amd => write!(f, "AMD"),
            GpuVendor::Nvidia => write!(f, "NVIDIA"),
            GpuVendor::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub name: String,
    pub driver_version: Option<String>,
    pub vendor: GpuVendor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_mb: f64,
    pub uptime_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityInstall {
    pub installed: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    /// The well-known service executable is present in the install dir
    pub service_exists: bool,
}
