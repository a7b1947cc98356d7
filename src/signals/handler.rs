/*!
 * Termination Handler
 * Clean-exit handling installed in freshly forked children
 */

use super::types::SignalResult;

#[cfg(unix)]
use super::types::SignalError;
#[cfg(unix)]
use nix::libc;
#[cfg(unix)]
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal as NixSignal};

/// Handler body. Runs in async-signal context, so it must not allocate,
/// lock, or run destructors.
#[cfg(unix)]
extern "C" fn exit_now(_signo: libc::c_int) {
    unsafe { libc::_exit(0) }
}

/// Install the clean-exit handler for `SIGTERM`.
///
/// Called by the child continuation immediately after the fork, before the
/// callable runs. A termination request then ends the child with exit
/// status 0 instead of the default signal death.
#[cfg(unix)]
pub(crate) fn install_termination_handler() -> SignalResult<()> {
    let action = SigAction::new(
        SigHandler::Handler(exit_now),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // SAFETY: exit_now only calls _exit, which is async-signal-safe, and
    // no other code in this process replaces the SIGTERM disposition.
    unsafe { sigaction(NixSignal::SIGTERM, &action) }
        .map(|_| ())
        .map_err(|e| SignalError::InstallFailed(e.to_string()))
}

#[cfg(not(unix))]
pub(crate) fn install_termination_handler() -> SignalResult<()> {
    Ok(())
}
