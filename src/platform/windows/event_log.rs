use std::time::Duration;

use crate::error::Result;

/// Query the Application log for recent error entries and return the raw
/// `ConvertTo-Json` output.
///
/// `TimeGenerated` is rendered with the round-trip (`o`) format so the
/// caller gets an RFC 3339 timestamp instead of the `/Date(..)/` form.
#[cfg(windows)]
pub fn query_application_errors(
    newest: u32,
    window_minutes: u32,
    timeout: Duration,
) -> Result<String> {
    use crate::platform::command::run_powershell;

    let script = format!(
        "Get-EventLog -LogName Application -EntryType Error -Newest {newest} | \
         Where-Object {{$_.TimeGenerated -gt (Get-Date).AddMinutes(-{window_minutes})}} | \
         Select-Object @{{n='TimeGenerated';e={{$_.TimeGenerated.ToString('o')}}}}, Source, Message, EventID | \
         ConvertTo-Json"
    );

    run_powershell(&script, timeout)
}

#[cfg(not(windows))]
pub fn query_application_errors(
    _newest: u32,
    _window_minutes: u32,
    _timeout: Duration,
) -> Result<String> {
    use crate::error::CrashWatchError;

    Err(CrashWatchError::unsupported(
        "the application event log is only available on Windows",
    ))
}
