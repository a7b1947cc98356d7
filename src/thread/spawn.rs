/*!
 * Fork Primitives
 * Thin wrappers over host process control
 */

use super::types::{ChildStatus, ThreadResult};
use crate::core::types::Pid;
use crate::signals::Signal;

#[cfg(unix)]
use super::types::ThreadError;
#[cfg(unix)]
use log::warn;
#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::kill;
#[cfg(unix)]
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
#[cfg(unix)]
use nix::unistd::{fork, ForkResult, Pid as NixPid};

/// Continuations produced by a successful fork
pub(crate) enum Forked {
    /// Parent side, holding the child pid
    Parent(Pid),
    /// Child side
    Child,
}

/// Outcome of a non-blocking liveness probe
pub(crate) enum Probe {
    Alive,
    Reaped(ChildStatus),
}

/// Whether this host can fork at all
pub(crate) const fn supported() -> bool {
    cfg!(unix)
}

/// Bifurcate the current process.
#[cfg(unix)]
pub(crate) fn fork_task() -> ThreadResult<Forked> {
    // SAFETY: fork in a process with threads leaves only the calling
    // thread in the child. The child continuation runs the caller's work
    // and exits without returning to code that could observe the state of
    // sibling threads.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(Forked::Parent(child.as_raw() as Pid)),
        Ok(ForkResult::Child) => Ok(Forked::Child),
        Err(e) => Err(ThreadError::ForkFailed(e.to_string())),
    }
}

/// Check a child without blocking, reaping it if it has exited.
#[cfg(unix)]
pub(crate) fn probe(pid: Pid) -> Probe {
    match waitpid(NixPid::from_raw(pid as i32), Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::StillAlive) => Probe::Alive,
        Ok(status) => match child_status(status) {
            Some(ended) => Probe::Reaped(ended),
            None => Probe::Alive,
        },
        Err(Errno::ECHILD) => {
            warn!("Child {} was already reaped outside this handle", pid);
            Probe::Reaped(ChildStatus::Unknown)
        }
        Err(e) => {
            warn!("Liveness probe for child {} failed: {}", pid, e);
            Probe::Alive
        }
    }
}

/// Block until a child is reaped.
#[cfg(unix)]
pub(crate) fn reap_blocking(pid: Pid) -> ThreadResult<ChildStatus> {
    loop {
        match waitpid(NixPid::from_raw(pid as i32), None) {
            Ok(status) => {
                if let Some(ended) = child_status(status) {
                    return Ok(ended);
                }
            }
            Err(Errno::EINTR) => {}
            Err(Errno::ECHILD) => return Ok(ChildStatus::Unknown),
            Err(e) => return Err(ThreadError::WaitFailed(e.to_string())),
        }
    }
}

/// Send `signal` to a child. Returns false when the process is gone.
#[cfg(unix)]
pub(crate) fn deliver(pid: Pid, signal: Signal) -> ThreadResult<bool> {
    match kill(NixPid::from_raw(pid as i32), signal.as_nix()) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(e) => Err(ThreadError::SignalFailed(e.to_string())),
    }
}

#[cfg(unix)]
fn child_status(status: WaitStatus) -> Option<ChildStatus> {
    match status {
        WaitStatus::Exited(_, code) => Some(ChildStatus::Exited(code)),
        WaitStatus::Signaled(_, signal, _) => Some(ChildStatus::Signaled(signal as i32)),
        _ => None,
    }
}

#[cfg(not(unix))]
pub(crate) fn fork_task() -> ThreadResult<Forked> {
    Err(super::types::ThreadError::UnsupportedEnvironment)
}

#[cfg(not(unix))]
pub(crate) fn probe(_pid: Pid) -> Probe {
    Probe::Reaped(ChildStatus::Unknown)
}

#[cfg(not(unix))]
pub(crate) fn reap_blocking(_pid: Pid) -> ThreadResult<ChildStatus> {
    Err(super::types::ThreadError::UnsupportedEnvironment)
}

#[cfg(not(unix))]
pub(crate) fn deliver(_pid: Pid, _signal: Signal) -> ThreadResult<bool> {
    Err(super::types::ThreadError::UnsupportedEnvironment)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_probe_foreign_pid_reports_unknown() {
        // PID 1 exists but is never our child, so the wait fails with
        // ECHILD and the probe reports an out-of-band reap.
        match probe(1) {
            Probe::Reaped(ChildStatus::Unknown) => {}
            Probe::Reaped(other) => panic!("unexpected status: {:?}", other),
            Probe::Alive => panic!("foreign pid reported alive"),
        }
    }

    #[test]
    fn test_deliver_to_vanished_pid() {
        // Larger than any pid the kernel hands out.
        assert!(!deliver(99_999_999, Signal::Kill).unwrap());
    }

    #[test]
    fn test_supported_on_unix() {
        assert!(supported());
    }
}
