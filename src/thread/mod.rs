/*!
 * Thread Module
 * Pseudo-threads executed in forked child processes
 */

mod callable;
mod handle;
mod spawn;
pub mod types;

// Re-export public API
pub use callable::Callable;
pub use handle::ForkThread;
pub use types::{ChildStatus, ThreadError, ThreadResult, ThreadState};
