/*!
 * Signals Module
 * Deliverable signals and the child-side termination handler
 */

mod handler;
pub mod types;

// Re-export public API
pub(crate) use handler::install_termination_handler;
pub use types::{Signal, SignalError, SignalResult};
