//! SIGINT/SIGTERM handling.
//!
//! The handlers only clear a process-wide flag. They are installed without
//! `SA_RESTART` so a blocking `poll(2)` returns `EINTR` and the loop notices
//! the flag right away.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

static RUNNING: AtomicBool = AtomicBool::new(true);

extern "C" fn request_stop(_signal: libc::c_int) {
    RUNNING.store(false, Ordering::SeqCst);
}

/// Install the stop handlers for SIGINT and SIGTERM.
pub fn install() -> io::Result<()> {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: the handler only stores to an atomic, which is
        // async-signal-safe; the sigaction struct is fully initialised.
        unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = request_stop as extern "C" fn(libc::c_int) as libc::sighandler_t;
            action.sa_flags = 0;
            libc::sigemptyset(&mut action.sa_mask);
            if libc::sigaction(signal, &action, std::ptr::null_mut()) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
    }
    Ok(())
}

/// The flag the main loop polls. Cleared by a stop signal.
pub fn running() -> &'static AtomicBool {
    &RUNNING
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_set() {
        assert!(running().load(Ordering::SeqCst));
    }
}
