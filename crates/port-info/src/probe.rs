//! Exclusive-access probing
//!
//! There is no OS query for "is this port in use". Instead the port is
//! opened for exclusive read/write access and closed again straight away;
//! the way the open fails tells whether another process holds it.
//!
//! - access denied: the port exists and is held by someone else (busy, valid)
//! - any other failure: the port is unusable or gone (not busy, not valid)
//! - success: the port is free (not busy, valid)

use std::io;

use tracing::debug;

/// How an exclusive open attempt ended
#[derive(Debug)]
pub enum OpenOutcome {
    /// Opened and closed again
    Opened,
    /// Refused because another handle holds the device
    AccessDenied,
    /// Refused for any other reason
    Failed(io::Error),
}

impl OpenOutcome {
    /// Busy means the open was refused with access denied
    pub fn indicates_busy(&self) -> bool {
        matches!(self, OpenOutcome::AccessDenied)
    }

    /// Valid unless the open failed for a reason other than access denied
    pub fn indicates_valid(&self) -> bool {
        !matches!(self, OpenOutcome::Failed(_))
    }
}

/// Attempt an exclusive read/write open of `location`, closing it on success
pub fn try_exclusive_open(location: &str) -> OpenOutcome {
    let outcome = platform::open_exclusive(location);
    debug!(location, ?outcome, "exclusive open attempt");
    outcome
}

/// True when another process holds `location` exclusively
pub fn is_busy(location: &str) -> bool {
    try_exclusive_open(location).indicates_busy()
}

/// False when `location` cannot be opened for a reason other than
/// being held by another process
pub fn is_valid(location: &str) -> bool {
    try_exclusive_open(location).indicates_valid()
}

#[cfg(windows)]
mod platform {
    use std::fs::OpenOptions;
    use std::os::windows::fs::OpenOptionsExt;

    use windows_sys::Win32::Foundation::ERROR_ACCESS_DENIED;

    use super::OpenOutcome;

    pub(super) fn open_exclusive(location: &str) -> OpenOutcome {
        // Share mode 0 denies every other handle while ours is open
        match OpenOptions::new()
            .read(true)
            .write(true)
            .share_mode(0)
            .open(location)
        {
            Ok(_file) => OpenOutcome::Opened,
            Err(e) if e.raw_os_error() == Some(ERROR_ACCESS_DENIED as i32) => {
                OpenOutcome::AccessDenied
            }
            Err(e) => OpenOutcome::Failed(e),
        }
    }
}

#[cfg(unix)]
mod platform {
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::AsRawFd;

    use super::OpenOutcome;

    pub(super) fn open_exclusive(location: &str) -> OpenOutcome {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(location)
        {
            Ok(file) => file,
            Err(e) => return classify(e),
        };

        // SAFETY: the descriptor is owned by `file` and stays open for the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc != 0 {
            return classify(io::Error::last_os_error());
        }
        // Dropping the file releases the lock and closes the descriptor
        OpenOutcome::Opened
    }

    pub(super) fn classify(e: io::Error) -> OpenOutcome {
        match e.raw_os_error() {
            Some(code)
                if code == libc::EWOULDBLOCK
                    || code == libc::EBUSY
                    || code == libc::EACCES
                    || code == libc::EPERM =>
            {
                OpenOutcome::AccessDenied
            }
            _ => OpenOutcome::Failed(e),
        }
    }
}

#[cfg(not(any(unix, windows)))]
mod platform {
    use std::io;

    use super::OpenOutcome;

    pub(super) fn open_exclusive(_location: &str) -> OpenOutcome {
        OpenOutcome::Failed(io::Error::from(io::ErrorKind::Unsupported))
    }
}
