/*!
 * Channel Module
 * Cross-process result transport
 */

mod fs;
pub mod traits;
pub mod types;

// Re-export public API
pub use fs::{FsChannel, CHANNEL_DIR_ENV};
pub use traits::ResultChannel;
pub use types::{ChannelError, ChannelResult};
