/*!
 * Filesystem Channel
 * One file per key under a shared directory, visible across forks
 */

use super::traits::ResultChannel;
use super::types::{ChannelError, ChannelResult};
use crate::core::types::ThreadKey;
use log::debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

/// Environment variable overriding the default channel directory
pub const CHANNEL_DIR_ENV: &str = "FORKTHREAD_CHANNEL_DIR";

static SHARED: OnceLock<Arc<FsChannel>> = OnceLock::new();

/// Result store backed by plain files.
///
/// Each key becomes one file under `root`. Publishes write to a dotfile
/// first and rename into place, so a reader never observes a partially
/// written value. The filesystem is what makes the store survive the
/// fork boundary: both continuations resolve the same paths.
#[derive(Debug, Clone)]
pub struct FsChannel {
    root: PathBuf,
}

impl FsChannel {
    /// Open a channel rooted at `root`, creating the directory if needed
    pub fn new<P: Into<PathBuf>>(root: P) -> ChannelResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| ChannelError::io(&root, e))?;
        debug!("Result channel rooted at {}", root.display());
        Ok(Self { root })
    }

    /// Process-wide default channel.
    ///
    /// Rooted at `$FORKTHREAD_CHANNEL_DIR` when set, otherwise at a
    /// `forkthread` directory under the system temp dir. The instance is
    /// created once and shared for the life of the process.
    pub fn shared() -> ChannelResult<Arc<Self>> {
        if let Some(channel) = SHARED.get() {
            return Ok(Arc::clone(channel));
        }
        let channel = Arc::new(Self::new(default_root())?);
        Ok(Arc::clone(SHARED.get_or_init(|| channel)))
    }

    /// Directory holding the published values
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &ThreadKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

fn default_root() -> PathBuf {
    match std::env::var_os(CHANNEL_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::temp_dir().join("forkthread"),
    }
}

impl ResultChannel for FsChannel {
    fn publish(&self, key: &ThreadKey, value: &[u8]) -> ChannelResult<()> {
        let staged = self.root.join(format!(".{}.tmp", key.as_str()));
        fs::write(&staged, value).map_err(|e| ChannelError::io(&staged, e))?;

        let path = self.path_for(key);
        fs::rename(&staged, &path).map_err(|e| ChannelError::io(&path, e))?;

        debug!("Published {} bytes under {}", value.len(), key);
        Ok(())
    }

    fn take(&self, key: &ThreadKey) -> ChannelResult<Option<Vec<u8>>> {
        let path = self.path_for(key);
        let value = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ChannelError::io(&path, e)),
        };

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(ChannelError::io(&path, e)),
        }

        debug!("Took {} bytes under {}", value.len(), key);
        Ok(Some(value))
    }

    fn release(&self, key: &ThreadKey) -> ChannelResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Released {}", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChannelError::io(&path, e)),
        }
    }
}
