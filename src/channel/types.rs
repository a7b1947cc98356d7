/*!
 * Channel Types
 * Errors for the cross-process result store
 */

use std::path::PathBuf;
use thiserror::Error;

/// Channel operation result
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Result store errors
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChannelError {
    #[error("Channel I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ChannelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChannelError::Io {
            path: path.into(),
            source,
        }
    }
}
