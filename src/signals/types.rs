/*!
 * Signal Types
 * Signals a caller may deliver to a running pseudo-thread
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Signal operation result
pub type SignalResult<T> = Result<T, SignalError>;

/// Signal errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    #[error("Invalid signal number: {0}")]
    InvalidSignal(u32),

    #[error("Handler installation failed: {0}")]
    InstallFailed(String),
}

/// Deliverable UNIX signals.
///
/// The set covers termination control for forked children. `Term` is the
/// cooperative request a pseudo-thread child honors with a clean exit;
/// `Kill` ends it unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum Signal {
    /// Hangup detected on controlling terminal
    Hup = 1,
    /// Interrupt from keyboard
    Int = 2,
    /// Quit from keyboard
    Quit = 3,
    /// Kill signal (cannot be caught or ignored)
    Kill = 9,
    /// User-defined signal 1
    Usr1 = 10,
    /// User-defined signal 2
    Usr2 = 12,
    /// Termination request
    Term = 15,
    /// Continue if stopped
    Cont = 18,
    /// Stop process (cannot be caught or ignored)
    Stop = 19,
}

impl Signal {
    /// Decode a raw signal number
    pub fn from_number(n: u32) -> SignalResult<Self> {
        match n {
            1 => Ok(Signal::Hup),
            2 => Ok(Signal::Int),
            3 => Ok(Signal::Quit),
            9 => Ok(Signal::Kill),
            10 => Ok(Signal::Usr1),
            12 => Ok(Signal::Usr2),
            15 => Ok(Signal::Term),
            18 => Ok(Signal::Cont),
            19 => Ok(Signal::Stop),
            _ => Err(SignalError::InvalidSignal(n)),
        }
    }

    /// Raw signal number
    #[inline]
    #[must_use]
    pub const fn number(&self) -> u32 {
        *self as u32
    }

    /// Conventional name, e.g. `SIGTERM`
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Signal::Hup => "SIGHUP",
            Signal::Int => "SIGINT",
            Signal::Quit => "SIGQUIT",
            Signal::Kill => "SIGKILL",
            Signal::Usr1 => "SIGUSR1",
            Signal::Usr2 => "SIGUSR2",
            Signal::Term => "SIGTERM",
            Signal::Cont => "SIGCONT",
            Signal::Stop => "SIGSTOP",
        }
    }

    /// Whether a process can install a handler for this signal
    #[must_use]
    pub const fn can_catch(&self) -> bool {
        !matches!(self, Signal::Kill | Signal::Stop)
    }

    /// Map to the host signal constant
    #[cfg(unix)]
    pub(crate) fn as_nix(&self) -> nix::sys::signal::Signal {
        use nix::sys::signal::Signal as Nix;
        match self {
            Signal::Hup => Nix::SIGHUP,
            Signal::Int => Nix::SIGINT,
            Signal::Quit => Nix::SIGQUIT,
            Signal::Kill => Nix::SIGKILL,
            Signal::Usr1 => Nix::SIGUSR1,
            Signal::Usr2 => Nix::SIGUSR2,
            Signal::Term => Nix::SIGTERM,
            Signal::Cont => Nix::SIGCONT,
            Signal::Stop => Nix::SIGSTOP,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_round_trip() {
        for sig in [
            Signal::Hup,
            Signal::Int,
            Signal::Quit,
            Signal::Kill,
            Signal::Usr1,
            Signal::Usr2,
            Signal::Term,
            Signal::Cont,
            Signal::Stop,
        ] {
            assert_eq!(Signal::from_number(sig.number()), Ok(sig));
        }
    }

    #[test]
    fn test_invalid_number_rejected() {
        assert_eq!(Signal::from_number(0), Err(SignalError::InvalidSignal(0)));
        assert_eq!(
            Signal::from_number(64),
            Err(SignalError::InvalidSignal(64))
        );
    }

    #[test]
    fn test_uncatchable_signals() {
        assert!(!Signal::Kill.can_catch());
        assert!(!Signal::Stop.can_catch());
        assert!(Signal::Term.can_catch());
        assert!(Signal::Int.can_catch());
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Signal::Term.to_string(), "SIGTERM(15)");
        assert_eq!(Signal::Kill.to_string(), "SIGKILL(9)");
    }

    #[cfg(unix)]
    #[test]
    fn test_host_mapping_agrees_on_number() {
        assert_eq!(Signal::Kill.as_nix() as i32, 9);
        assert_eq!(Signal::Term.as_nix() as i32, 15);
    }
}
