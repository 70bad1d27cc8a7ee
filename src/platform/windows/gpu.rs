use crate::error::Result;
#[cfg(not(windows))]
use crate::error::CrashWatchError;
use serde::Deserialize;
#[cfg(windows)]
use wmi::WMIConnection;

/// Raw video controller row as reported by the OS
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct VideoController {
    pub name: String,
    pub driver_version: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename = "Win32_VideoController")]
#[serde(rename_all = "PascalCase")]
#[cfg_attr(not(windows), allow(dead_code))]
struct Win32VideoController {
    name: Option<String>,
    driver_version: Option<String>,
}

/// Enumerate installed video controllers using WMI
#[cfg(windows)]
pub fn get_video_controllers() -> Result<Vec<VideoController>> {
    use crate::error::CrashWatchError;

    let wmi_con = WMIConnection::new()
        .map_err(|e| CrashWatchError::wmi(format!("Failed to connect to WMI: {}", e)))?;

    let rows: Vec<Win32VideoController> = wmi_con
        .query()
        .map_err(|e| CrashWatchError::wmi(format!("WMI query failed: {}", e)))?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            row.name.map(|name| VideoController {
                name,
                driver_version: row.driver_version,
            })
        })
        .collect())
}

#[cfg(not(windows))]
pub fn get_video_controllers() -> Result<Vec<VideoController>> {
    Err(CrashWatchError::unsupported(
        "video controller enumeration is only available on Windows",
    ))
}
