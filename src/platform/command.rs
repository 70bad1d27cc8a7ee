//! Bounded execution of external helpers (PowerShell on Windows).

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use wait_timeout::ChildExt;

use crate::error::{CrashWatchError, Result};

/// Run `program` and collect its stdout, killing it once `timeout` elapses.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> Result<String> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(0x08000000); // CREATE_NO_WINDOW
    }

    let mut child = command
        .spawn()
        .map_err(|e| CrashWatchError::command(format!("Failed to start {program}: {e}")))?;

    // Drain stdout on a separate thread so a chatty child cannot fill the
    // pipe and stall before we get to wait on it.
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| CrashWatchError::command(format!("{program} stdout was not captured")))?;
    let reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });

    match child.wait_timeout(timeout)? {
        Some(status) => {
            let output = reader
                .join()
                .map_err(|_| CrashWatchError::command(format!("{program} output reader panicked")))??;

            if !status.success() {
                return Err(CrashWatchError::command(format!(
                    "{program} exited with {status}"
                )));
            }

            Ok(String::from_utf8_lossy(&output).into_owned())
        }
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(CrashWatchError::timeout(program, timeout))
        }
    }
}

pub fn run_powershell(script: &str, timeout: Duration) -> Result<String> {
    run_with_timeout(
        "powershell",
        &["-NoProfile", "-NonInteractive", "-Command", script],
        timeout,
    )
}

/// Parse `ConvertTo-Json` output, which is a bare object for a single row
/// and an array otherwise. Empty output means no rows.
pub fn parse_json_rows<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let raw: serde_json::Value = serde_json::from_str(trimmed)?;
    let rows = match raw {
        serde_json::Value::Array(arr) => serde_json::from_value(serde_json::Value::Array(arr))?,
        serde_json::Value::Null => Vec::new(),
        value => vec![serde_json::from_value(value)?],
    };

    Ok(rows)
}
