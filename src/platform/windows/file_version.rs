use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Read the `FileVersion` resource of an executable.
///
/// `Ok(None)` when the file carries no version metadata.
#[cfg(windows)]
pub fn get_file_version(path: &Path, timeout: Duration) -> Result<Option<String>> {
    use crate::platform::command::run_powershell;

    // Single quotes keep PowerShell from expanding `$` in the path.
    let quoted = path.display().to_string().replace('\'', "''");
    let script = format!("(Get-Item -LiteralPath '{quoted}').VersionInfo.FileVersion");

    let stdout = run_powershell(&script, timeout)?;
    let version = stdout.trim();

    Ok((!version.is_empty()).then(|| version.to_string()))
}

#[cfg(not(windows))]
pub fn get_file_version(_path: &Path, _timeout: Duration) -> Result<Option<String>> {
    Ok(None)
}
