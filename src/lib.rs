/*!
 * forkthread
 * Pseudo-threads built on process forking
 *
 * A `ForkThread` runs a named callable in a forked child process. The
 * parent keeps a handle for liveness checks, signaling and result
 * collection; the child publishes its return value through a channel
 * that survives the fork boundary and exits. The model mirrors thread
 * APIs without any shared-memory threading: parallelism comes from the
 * OS scheduler, isolation from separate address spaces.
 */

pub mod channel;
pub mod core;
pub mod signals;
pub mod thread;

// Re-exports
pub use crate::channel::{ChannelError, ChannelResult, FsChannel, ResultChannel, CHANNEL_DIR_ENV};
pub use crate::core::types::{Pid, ThreadKey};
pub use crate::signals::{Signal, SignalError};
pub use crate::thread::{Callable, ChildStatus, ForkThread, ThreadError, ThreadResult, ThreadState};
