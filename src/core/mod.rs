/*!
 * Core Module
 * Shared identifiers and the binary codec
 */

pub mod serialization;
pub mod types;

// Re-export for convenience
pub use serialization::{BincodeError, BincodeResult};
pub use types::{Pid, ThreadKey};
