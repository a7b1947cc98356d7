/*!
 * Core Types
 * Identifiers shared by the thread and channel layers
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Process ID type
pub type Pid = u32;

/// One-shot key under which a forked child publishes its result.
///
/// A fresh key is minted for every start, before the process bifurcates,
/// so the parent and the child continuation hold the same value. Keys are
/// safe to use as file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadKey(String);

impl ThreadKey {
    /// Mint a fresh, collision-resistant key
    #[must_use]
    pub fn mint() -> Self {
        Self(format!("thread-{}", Uuid::new_v4().simple()))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_unique() {
        let a = ThreadKey::mint();
        let b = ThreadKey::mint();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_is_filename_safe() {
        let key = ThreadKey::mint();
        assert!(key.as_str().starts_with("thread-"));
        assert!(!key.as_str().contains(std::path::MAIN_SEPARATOR));
    }

    #[test]
    fn test_display_matches_as_str() {
        let key = ThreadKey::mint();
        assert_eq!(key.to_string(), key.as_str());
    }
}
