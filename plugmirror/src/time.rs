//! Staleness clock abstraction.
//!
//! The cache uses filesystem modification times as its staleness clock.
//! Wrapping "now" behind a trait lets tests simulate TTL expiry without
//! touching real file timestamps.

use std::path::Path;
use std::time::{Duration, SystemTime};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> SystemTime;
}

/// Production clock backed by [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Age of the file at `path` relative to the given clock.
///
/// Returns `None` if the file does not exist or its modification time is
/// unavailable. A modification time ahead of the clock reads as zero age
/// rather than an error.
pub fn file_age(clock: &impl Clock, path: &Path) -> Option<Duration> {
    let mtime = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(clock.now().duration_since(mtime).unwrap_or(Duration::ZERO))
}
