/// Whether the monitor runs with administrator (Windows) or root (Unix)
/// rights. Event log and registry probes return less without them.
pub fn is_elevated() -> bool {
    token_is_elevated().unwrap_or(false)
}

#[cfg(windows)]
fn token_is_elevated() -> Option<bool> {
    use std::mem;
    use std::ptr;
    use winapi::ctypes::c_void;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
    use winapi::um::securitybaseapi::GetTokenInformation;
    use winapi::um::winnt::{TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY};

    unsafe {
        let mut token: *mut c_void = ptr::null_mut();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            return None;
        }

        let mut elevation: TOKEN_ELEVATION = mem::zeroed();
        let mut returned: u32 = 0;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut _ as *mut c_void,
            mem::size_of::<TOKEN_ELEVATION>() as u32,
            &mut returned,
        );
        CloseHandle(token);

        (ok != 0).then_some(elevation.TokenIsElevated != 0)
    }
}

#[cfg(unix)]
fn token_is_elevated() -> Option<bool> {
    Some(unsafe { libc::geteuid() } == 0)
}

#[cfg(not(any(windows, unix)))]
fn token_is_elevated() -> Option<bool> {
    None
}
