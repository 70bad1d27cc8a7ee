use crate::error::Result;

#[cfg_attr(not(windows), allow(dead_code))]
const GRAPHICS_DRIVERS_KEY: &str = r"SYSTEM\CurrentControlSet\Control\GraphicsDrivers";

/// `HwSchMode` value that means hardware-accelerated GPU scheduling is on
#[cfg_attr(not(windows), allow(dead_code))]
const HWSCH_ENABLED: u32 = 2;

/// Read the hardware-accelerated GPU scheduling flag.
///
/// `Ok(None)` when the key or value is absent, which is common on systems
/// whose driver never exposed the toggle.
#[cfg(windows)]
pub fn hardware_scheduling_enabled() -> Result<Option<bool>> {
    use crate::error::CrashWatchError;
    use std::io::ErrorKind;
    use winreg::enums::*;
    use winreg::RegKey;

    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = match hklm.open_subkey_with_flags(GRAPHICS_DRIVERS_KEY, KEY_READ) {
        Ok(key) => key,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CrashWatchError::registry(format!(
                "Failed to open {GRAPHICS_DRIVERS_KEY}: {e}"
            )))
        }
    };

    match key.get_value::<u32, _>("HwSchMode") {
        Ok(mode) => Ok(Some(mode == HWSCH_ENABLED)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CrashWatchError::registry(format!(
            "Failed to read HwSchMode: {e}"
        ))),
    }
}

#[cfg(not(windows))]
pub fn hardware_scheduling_enabled() -> Result<Option<bool>> {
    Ok(None)
}
