/*!
 * Channel Trait
 * Abstraction over the store that carries results between processes
 */

use super::types::ChannelResult;
use crate::core::types::ThreadKey;

/// One-shot key-value transport from a forked child to its parent.
///
/// A channel must be reachable from both sides of a fork: the child
/// publishes through its copied handle and the parent takes through the
/// original, so the backing store has to live outside process memory.
/// Values are opaque bytes; encoding is the caller's concern.
pub trait ResultChannel: Send + Sync {
    /// Store a value under `key`, replacing any previous value
    fn publish(&self, key: &ThreadKey, value: &[u8]) -> ChannelResult<()>;

    /// Remove and return the value under `key`, if one was published
    fn take(&self, key: &ThreadKey) -> ChannelResult<Option<Vec<u8>>>;

    /// Drop any value under `key`. Releasing an absent key is not an error
    fn release(&self, key: &ThreadKey) -> ChannelResult<()>;
}
