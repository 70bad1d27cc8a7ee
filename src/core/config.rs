use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process the monitor is watching for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub display_name: String,
    /// The game may ship under several executable names; the first match wins.
    pub process_names: Vec<String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            display_name: "BF6".to_string(),
            process_names: vec![
                "bf6.exe".to_string(),
                "bf2042.exe".to_string(),
                "Battlefield2042.exe".to_string(),
            ],
        }
    }
}

/// Anti-cheat / companion service checked alongside the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityServiceConfig {
    pub display_name: String,
    pub process_names: Vec<String>,
    pub install_dir: PathBuf,
    pub service_executable: String,
    /// Lowercase substrings that tie an event log message to this service
    pub log_markers: Vec<String>,
}

impl Default for SecurityServiceConfig {
    fn default() -> Self {
        Self {
            display_name: "EA Javelin".to_string(),
            process_names: vec![
                "JavelinAC.exe".to_string(),
                "Javelin.exe".to_string(),
                "EAAntiCheat.GameService.exe".to_string(),
                "EAAntiCheat.GameServiceLauncher.exe".to_string(),
            ],
            install_dir: PathBuf::from(r"C:\Program Files\EA\AC"),
            service_executable: "EAAntiCheat.GameService.exe".to_string(),
            log_markers: vec!["eaanticheat".to_string(), "javelin".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventLogConfig {
    pub window_minutes: u32,
    pub max_entries: u32,
    pub timeout_secs: u64,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            window_minutes: 10,
            max_entries: 30,
            timeout_secs: 15,
        }
    }
}

impl EventLogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub target: TargetConfig,
    pub security_service: SecurityServiceConfig,
    /// Directory for daily activity logs and crash reports
    pub log_dir: PathBuf,
    pub poll_interval_ms: u64,
    pub event_log: EventLogConfig,
    pub version_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            security_service: SecurityServiceConfig::default(),
            log_dir: PathBuf::from("crash_logs"),
            poll_interval_ms: 2000,
            event_log: EventLogConfig::default(),
            version_timeout_secs: 5,
        }
    }
}

impl MonitorConfig {
    /// Load the config from the default location, falling back to defaults
    /// when the file does not exist yet.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if data.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, data)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("crashwatch").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.process_names.is_empty() {
            anyhow::bail!("target.process_names must list at least one executable");
        }
        if self.poll_interval_ms == 0 {
            anyhow::bail!("poll_interval_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn version_timeout(&self) -> Duration {
        Duration::from_secs(self.version_timeout_secs)
    }

    pub fn event_window(&self) -> Duration {
        Duration::from_secs(u64::from(self.event_log.window_minutes) * 60)
    }
}
