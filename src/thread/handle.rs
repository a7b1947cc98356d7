/*!
 * Pseudo-Thread
 * Fork-backed execution of a callable with one-shot result handoff
 */

use super::callable::Callable;
use super::spawn::{self, Forked, Probe};
use super::types::{ThreadError, ThreadResult, ThreadState};
use crate::channel::{FsChannel, ResultChannel};
use crate::core::serialization;
use crate::core::types::ThreadKey;
use crate::signals::{self, Signal};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::process;
use std::sync::Arc;

/// A pseudo-thread: a callable executed in a forked child process.
///
/// Each `start` bifurcates the calling process. The parent keeps the
/// handle and observes the child through `is_alive`, `result` and `stop`;
/// the child runs the callable, publishes its value through the result
/// channel, and exits without ever returning from `start`.
///
/// ```no_run
/// use forkthread::{Callable, ForkThread};
///
/// # fn main() -> Result<(), forkthread::ThreadError> {
/// let mut task = ForkThread::new(Callable::new("add-one", |n: i32| Some(n + 1)))?;
/// task.start(41)?;
/// while task.is_alive() {}
/// assert_eq!(task.result()?, Some(42));
/// # Ok(())
/// # }
/// ```
///
/// # Fork semantics
///
/// Arguments reach the child through the forked memory image, so no
/// marshaling happens on the way in; only the returned value crosses back
/// through the channel. The child ends with `process::exit`, which skips
/// destructors of everything alive in its copy of the address space.
/// Dropping the handle neither stops nor reaps a running child.
pub struct ForkThread<A, R> {
    callable: Callable<A, R>,
    channel: Arc<dyn ResultChannel>,
    state: ThreadState,
    pending: Option<ThreadKey>,
}

impl<A, R> ForkThread<A, R>
where
    R: Serialize + DeserializeOwned,
{
    /// Bind a callable to the process-wide default channel.
    ///
    /// Fails on hosts without fork support and on callables with a blank
    /// name.
    pub fn new(callable: Callable<A, R>) -> ThreadResult<Self> {
        let channel = FsChannel::shared()?;
        Self::with_channel(callable, channel)
    }

    /// Bind a callable to an explicit result channel.
    pub fn with_channel(
        callable: Callable<A, R>,
        channel: Arc<dyn ResultChannel>,
    ) -> ThreadResult<Self> {
        if !spawn::supported() {
            return Err(ThreadError::UnsupportedEnvironment);
        }
        if callable.name().trim().is_empty() {
            return Err(ThreadError::InvalidCallable {
                name: callable.name().to_string(),
            });
        }
        debug!("Pseudo-thread bound to callable '{}'", callable.name());
        Ok(Self {
            callable,
            channel,
            state: ThreadState::Unstarted,
            pending: None,
        })
    }

    /// Fork a child and run the callable in it.
    ///
    /// Returns in the parent once the child exists; the child continuation
    /// never returns from this call. Starting again while an earlier child
    /// is unreaped abandons that child and its unconsumed result.
    pub fn start(&mut self, args: A) -> ThreadResult<()> {
        if let ThreadState::Running { pid } = self.state {
            warn!("Restart with child {} unreaped; it will not be stopped", pid);
        }

        // The store has no expiry, so an unconsumed value from a previous
        // run is dropped before its key is replaced.
        if let Some(stale) = self.pending.take() {
            debug!("Releasing unconsumed result key {}", stale);
            if let Err(e) = self.channel.release(&stale) {
                warn!("Stale key {} could not be released: {}", stale, e);
            }
        }

        // Minted before the fork so both continuations hold the same key.
        let key = ThreadKey::mint();
        self.pending = Some(key.clone());

        match spawn::fork_task()? {
            Forked::Parent(pid) => {
                self.state = ThreadState::Running { pid };
                info!("Callable '{}' running in child {}", self.callable.name(), pid);
                Ok(())
            }
            Forked::Child => self.run_child(args, &key),
        }
    }

    /// Child continuation: install the termination handler, run the work,
    /// publish, exit.
    fn run_child(&mut self, args: A, key: &ThreadKey) -> ! {
        if let Err(e) = signals::install_termination_handler() {
            warn!("Termination handler not installed: {}", e);
        }

        // The callable must not unwind into the forked copy of the
        // caller's stack, where destructors owned by the parent image
        // would run with observable side effects.
        let value = match catch_unwind(AssertUnwindSafe(|| self.callable.invoke(args))) {
            Ok(value) => value,
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("opaque panic payload");
                error!(
                    "Callable '{}' panicked in child: {}",
                    self.callable.name(),
                    reason
                );
                process::exit(1)
            }
        };

        if let Some(value) = value {
            if let Err(e) = self.publish_value(key, &value) {
                error!(
                    "Child could not publish result of '{}': {}",
                    self.callable.name(),
                    e
                );
                process::exit(1);
            }
        }

        process::exit(0)
    }

    fn publish_value(&self, key: &ThreadKey, value: &R) -> ThreadResult<()> {
        let bytes = serialization::to_vec(value)?;
        self.channel.publish(key, &bytes)?;
        debug!("Child published {} bytes under {}", bytes.len(), key);
        Ok(())
    }

    /// Whether the child process is still running.
    ///
    /// Probes without blocking and reaps the child when it has exited,
    /// moving the state to `Completed`. A handle that was never started
    /// reports false.
    pub fn is_alive(&mut self) -> bool {
        let pid = match self.state {
            ThreadState::Running { pid } => pid,
            _ => return false,
        };

        match spawn::probe(pid) {
            Probe::Alive => true,
            Probe::Reaped(status) => {
                debug!("Child {} finished: {:?}", pid, status);
                self.state = ThreadState::Completed { status };
                false
            }
        }
    }

    /// Collect the published value, consuming the result key.
    ///
    /// One-shot: the first call takes the value and every later call
    /// returns `None` until the next `start`. Calling before the child has
    /// published also returns `None` and still consumes the key, so a
    /// value published afterwards is orphaned. Callers who want the value
    /// should wait for `is_alive` to turn false first.
    pub fn result(&mut self) -> ThreadResult<Option<R>> {
        let key = match self.pending.take() {
            Some(key) => key,
            None => return Ok(None),
        };

        match self.channel.take(&key)? {
            Some(bytes) => Ok(Some(serialization::from_slice(&bytes)?)),
            None => {
                if self.state.is_running() {
                    warn!(
                        "Key {} consumed with nothing published; a late value will be orphaned",
                        key
                    );
                }
                Ok(None)
            }
        }
    }

    /// Kill the child unconditionally without waiting for it.
    ///
    /// Equivalent to `stop_with(Signal::Kill, false)`.
    pub fn stop(&mut self) -> ThreadResult<()> {
        self.stop_with(Signal::Kill, false)
    }

    /// Send `signal` to the child, optionally blocking until it is reaped.
    ///
    /// Does nothing unless the child is currently alive. With `wait` the
    /// call reaps the child and records how it ended; without it the exit
    /// is picked up by a later `is_alive`.
    pub fn stop_with(&mut self, signal: Signal, wait: bool) -> ThreadResult<()> {
        if !self.is_alive() {
            return Ok(());
        }
        let pid = match self.state {
            ThreadState::Running { pid } => pid,
            _ => return Ok(()),
        };

        if spawn::deliver(pid, signal)? {
            info!("Sent {} to child {}", signal, pid);
        } else {
            debug!("Child {} was gone before {} arrived", pid, signal);
        }

        if wait {
            let status = spawn::reap_blocking(pid)?;
            debug!("Child {} reaped after stop: {:?}", pid, status);
            self.state = ThreadState::Completed { status };
        }
        Ok(())
    }

    /// Name of the bound callable
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.callable.name()
    }

    /// Current lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ThreadState {
        self.state
    }

    /// Whether a result key from the last start is still unconsumed
    #[inline]
    #[must_use]
    pub fn has_pending_result(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn channel() -> (TempDir, Arc<FsChannel>) {
        let dir = TempDir::new().unwrap();
        let channel = Arc::new(FsChannel::new(dir.path()).unwrap());
        (dir, channel)
    }

    #[test]
    fn test_blank_callable_name_rejected() {
        let (_dir, channel) = channel();
        let err = ForkThread::with_channel(Callable::new("", |n: i32| Some(n)), channel)
            .err()
            .unwrap();
        match err {
            ThreadError::InvalidCallable { name } => assert_eq!(name, ""),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_whitespace_callable_name_rejected() {
        let (_dir, channel) = channel();
        assert!(
            ForkThread::with_channel(Callable::new("   ", |n: i32| Some(n)), channel).is_err()
        );
    }

    #[test]
    fn test_unstarted_thread() {
        let (_dir, channel) = channel();
        let mut thread =
            ForkThread::with_channel(Callable::new("idle", |_: ()| Some(0u8)), channel).unwrap();

        assert_eq!(thread.state(), ThreadState::Unstarted);
        assert!(!thread.is_alive());
        assert!(!thread.has_pending_result());
        assert_eq!(thread.result().unwrap(), None);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let (_dir, channel) = channel();
        let mut thread =
            ForkThread::with_channel(Callable::new("idle", |_: ()| Some(0u8)), channel).unwrap();

        thread.stop().unwrap();
        thread.stop_with(Signal::Term, true).unwrap();
        assert_eq!(thread.state(), ThreadState::Unstarted);
    }

    #[test]
    fn test_name_accessor() {
        let (_dir, channel) = channel();
        let thread =
            ForkThread::with_channel(Callable::new("worker", |_: ()| Some(0u8)), channel).unwrap();
        assert_eq!(thread.name(), "worker");
    }
}
