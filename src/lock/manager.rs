//! Lock Manager
//!
//! Acquires and releases the sentinel lock for one data file.
//!
//! ## Acquisition
//! 1. `mkdir` the sentinel. Success means we own it: write the heartbeat,
//!    start renewal, return a guard.
//! 2. Otherwise poll until the budget (one timeout) runs out:
//!    - heartbeat at least one timeout old → holder is dead, remove the
//!      sentinel and go back to step 1 (budget restarts)
//!    - heartbeat missing → wait once for timeout/250; if still missing,
//!      go back to step 1 (a heartbeat-less sentinel whose directory is a
//!      timeout old is removed first)
//!    - heartbeat fresh → sleep timeout/500
//! 3. Budget exhausted → `LockTimeout`
//!
//! Locks are not reentrant: acquiring twice from the same manager waits on
//! our own sentinel like any other contender.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{JsonDbError, Result};
use crate::request::Operation;

use super::{lock_dir_for, now_millis, Heartbeat, Sentinel};

/// Lifecycle of a lock as seen by its manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Acquiring,
    Held,
    Releasing,
}

/// Whether a request needs the lock
///
/// Any access to an existing file is exclusive. A write to a missing file
/// is locked too so that creating the file is serialized. A read of a
/// missing file has nothing to protect.
pub fn should_lock(file_exists: bool, operation: Operation) -> bool {
    file_exists || operation == Operation::Write
}

/// Outcome of one polling round on a contended sentinel
enum WaitOutcome {
    /// The sentinel is (probably) free, try to create it again
    Retry,
    /// The holder stayed alive for the whole budget
    TimedOut(Duration),
}

/// Directory-based cross-process lock for a single data file
#[derive(Debug)]
pub struct LockManager {
    sentinel: Sentinel,

    /// Wait budget and staleness threshold
    timeout: Duration,

    heartbeat_interval: Duration,
    poll_interval: Duration,
    transient_wait: Duration,

    state: Mutex<LockState>,
}

impl LockManager {
    /// Manager for an explicit sentinel directory
    pub fn new(config: &Config, lock_dir: impl Into<PathBuf>) -> Self {
        Self {
            sentinel: Sentinel::new(lock_dir),
            timeout: config.lock_timeout(),
            heartbeat_interval: config.heartbeat_interval(),
            poll_interval: config.poll_interval(),
            transient_wait: config.transient_wait(),
            state: Mutex::new(LockState::Unlocked),
        }
    }

    /// Manager for the sentinel guarding `file`
    pub fn for_file(config: &Config, file: &Path) -> Self {
        Self::new(config, lock_dir_for(file))
    }

    /// Acquire the lock, blocking for at most one timeout per contended round
    pub fn acquire(&self) -> Result<LockGuard<'_>> {
        let previous = self.state();
        self.set_state(LockState::Acquiring);
        let result = self.acquire_inner();
        if result.is_err() {
            self.set_state(previous);
        }
        result
    }

    fn acquire_inner(&self) -> Result<LockGuard<'_>> {
        let started = Instant::now();

        loop {
            if self.sentinel.try_create()? {
                let heartbeat = self.start_holding().map_err(|e| {
                    // Don't leave a sentinel behind that nobody renews
                    let _ = self.sentinel.remove();
                    JsonDbError::from(e)
                })?;

                self.set_state(LockState::Held);
                tracing::debug!(
                    lock_dir = %self.lock_dir().display(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Lock acquired"
                );

                return Ok(LockGuard {
                    manager: self,
                    heartbeat,
                    released: false,
                });
            }

            match self.wait_for_release()? {
                WaitOutcome::Retry => continue,
                WaitOutcome::TimedOut(waited) => {
                    tracing::warn!(
                        lock_dir = %self.lock_dir().display(),
                        waited_ms = waited.as_millis() as u64,
                        "Timed out waiting for lock"
                    );
                    return Err(JsonDbError::LockTimeout {
                        lock_dir: self.lock_dir().to_path_buf(),
                        waited_ms: waited.as_millis() as u64,
                    });
                }
            }
        }
    }

    fn start_holding(&self) -> std::io::Result<Heartbeat> {
        self.sentinel.touch()?;
        Heartbeat::start(self.sentinel.clone(), self.heartbeat_interval)
    }

    /// Poll a sentinel someone else created until it frees up, goes stale,
    /// or the budget runs out
    fn wait_for_release(&self) -> Result<WaitOutcome> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let mut waited = Duration::ZERO;
        let mut known_transient = false;

        while waited <= self.timeout {
            match self.sentinel.read_heartbeat()? {
                Some(beat) => {
                    let age_ms = now_millis().saturating_sub(beat);
                    if age_ms >= timeout_ms {
                        tracing::warn!(
                            lock_dir = %self.lock_dir().display(),
                            age_ms,
                            "Reclaiming stale lock"
                        );
                        self.sentinel.remove()?;
                        return Ok(WaitOutcome::Retry);
                    }

                    tracing::trace!(age_ms, waited_ms = waited.as_millis() as u64, "Lock busy");
                    thread::sleep(self.poll_interval);
                    waited += self.poll_interval;
                }
                None if self.sentinel.exists() && !known_transient => {
                    // Another process is between mkdir and its first heartbeat,
                    // or between deleting the heartbeat and the directory
                    known_transient = true;
                    thread::sleep(self.transient_wait);
                    waited += self.transient_wait;
                }
                None => {
                    // Still no heartbeat: treat the sentinel as gone and retry.
                    // One left by a holder that died before its first heartbeat
                    // is cleared once the directory itself is a timeout old.
                    if let Some(modified) = self.sentinel.modified_millis()? {
                        let age_ms = now_millis().saturating_sub(modified);
                        if age_ms >= timeout_ms {
                            tracing::warn!(
                                lock_dir = %self.lock_dir().display(),
                                age_ms,
                                "Clearing abandoned lock without a heartbeat"
                            );
                            self.sentinel.remove()?;
                        }
                    }
                    return Ok(WaitOutcome::Retry);
                }
            }
        }

        Ok(WaitOutcome::TimedOut(waited))
    }

    pub fn lock_dir(&self) -> &Path {
        self.sentinel.dir()
    }

    pub fn state(&self) -> LockState {
        *self.state.lock()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn set_state(&self, state: LockState) {
        *self.state.lock() = state;
    }
}

/// Proof of holding the lock. Releases on `release()` or on drop, so every
/// exit path of the protected section gives the lock back.
#[derive(Debug)]
pub struct LockGuard<'a> {
    manager: &'a LockManager,
    heartbeat: Heartbeat,
    released: bool,
}

impl LockGuard<'_> {
    /// Release the lock, reporting failure to remove the sentinel
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    pub fn lock_dir(&self) -> &Path {
        self.manager.lock_dir()
    }

    fn release_inner(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.manager.set_state(LockState::Releasing);

        // Stop renewals before the directory goes away
        self.heartbeat.stop();
        let removed = self.manager.sentinel.remove();

        self.manager.set_state(LockState::Unlocked);
        tracing::debug!(lock_dir = %self.lock_dir().display(), "Lock released");
        removed.map_err(JsonDbError::from)
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            tracing::warn!(lock_dir = %self.lock_dir().display(), error = %e, "Failed to release lock");
        }
    }
}
