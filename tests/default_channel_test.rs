/*!
 * Default Channel Integration Tests
 * The process-wide channel and its environment override
 *
 * Kept as a single test in its own binary: the assertions below own
 * FORKTHREAD_CHANNEL_DIR and the once-initialized shared channel for
 * the whole process.
 */

#![cfg(unix)]

use forkthread::{Callable, ForkThread, FsChannel, CHANNEL_DIR_ENV};
use pretty_assertions::assert_eq;
use std::env;
use std::fs;
use std::thread::sleep;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[test]
fn test_default_channel_honors_env_override() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    env::set_var(CHANNEL_DIR_ENV, dir.path());

    let shared = FsChannel::shared().unwrap();
    assert_eq!(shared.root(), dir.path());

    let mut thread = ForkThread::new(Callable::new("add-one", |n: i32| Some(n + 1))).unwrap();
    thread.start(41).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while thread.is_alive() {
        assert!(Instant::now() < deadline, "child did not exit in time");
        sleep(Duration::from_millis(10));
    }

    // The value traveled through the overridden root, and collecting it
    // leaves the store empty again.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(thread.result().unwrap(), Some(42));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
