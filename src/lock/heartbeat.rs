//! Heartbeat renewal
//!
//! While a lock is held a background thread rewrites the sentinel's
//! timestamp so waiters can tell a live holder from a crashed one.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};

use super::Sentinel;

/// Running heartbeat task. Stopped explicitly or on drop.
#[derive(Debug)]
pub struct Heartbeat {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Heartbeat {
    /// Spawn a thread that calls `sentinel.touch()` every `interval`
    pub fn start(sentinel: Sentinel, interval: Duration) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("jsondb-heartbeat".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = sentinel.touch() {
                            tracing::warn!(
                                lock_dir = %sentinel.dir().display(),
                                error = %e,
                                "Failed to renew lock heartbeat"
                            );
                        } else {
                            tracing::trace!(lock_dir = %sentinel.dir().display(), "Heartbeat renewed");
                        }
                    }
                    // Stop requested, or the owning Heartbeat was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop renewing and wait for the thread to exit
    ///
    /// After this returns no further heartbeat writes will happen.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("Heartbeat thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Heartbeat {
    fn drop(&mut self) {
        self.stop();
    }
}
