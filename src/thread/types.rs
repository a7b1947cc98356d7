/*!
 * Thread Types
 * Lifecycle states, exit reporting, and errors for pseudo-threads
 */

use crate::channel::ChannelError;
use crate::core::serialization::BincodeError;
use crate::core::types::Pid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Thread operation result
pub type ThreadResult<T> = Result<T, ThreadError>;

/// Pseudo-thread errors
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("Process forking is not supported on this platform")]
    UnsupportedEnvironment,

    #[error("Callable '{name}' is not invocable")]
    InvalidCallable { name: String },

    #[error("Fork failed: {0}")]
    ForkFailed(String),

    #[error("Signal delivery failed: {0}")]
    SignalFailed(String),

    #[error("Wait on child failed: {0}")]
    WaitFailed(String),

    #[error("Result channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Result codec error: {0}")]
    Codec(#[from] BincodeError),
}

/// Where a pseudo-thread is in its lifecycle.
///
/// `Running` means a child was forked and has not been reaped; the child
/// process itself may already have exited. Observation through `is_alive`
/// or a waited stop is what moves the state to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadState {
    /// No child has been forked yet
    Unstarted,
    /// A child was forked and has not been reaped
    Running { pid: Pid },
    /// The child was reaped
    Completed { status: ChildStatus },
}

impl ThreadState {
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, ThreadState::Running { .. })
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, ThreadState::Completed { .. })
    }

    /// Child pid while running
    #[must_use]
    pub const fn pid(&self) -> Option<Pid> {
        match self {
            ThreadState::Running { pid } => Some(*pid),
            _ => None,
        }
    }
}

/// How a reaped child ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildStatus {
    /// Normal exit with the given code
    Exited(i32),
    /// Terminated by the given signal number
    Signaled(i32),
    /// Reaped out of band, status not observable
    Unknown,
}

impl ChildStatus {
    /// Clean completion
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self, ChildStatus::Exited(0))
    }
}
