//! Configuration for jsondb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{JsonDbError, Result};

/// Main configuration for a jsondb engine
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Database file used when a request leaves its file path blank.
    /// The lock sentinel lives next to it:
    ///   {dir}/
    ///     ├── JsonDatabase.Global.json
    ///     └── ~JsonDatabase.Global.json.lock/time   (only while locked)
    pub default_db_path: PathBuf,

    // -------------------------------------------------------------------------
    // Lock Configuration
    // -------------------------------------------------------------------------
    /// Total wait budget for acquiring a lock, and the heartbeat age after
    /// which a held lock is considered stale (milliseconds)
    pub lock_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_db_path: PathBuf::from("./JsonDatabase.Global.json"),
            lock_timeout_ms: 20_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject configurations the lock protocol cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(JsonDbError::Config(
                "lock_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.default_db_path.as_os_str().is_empty() {
            return Err(JsonDbError::Config(
                "default_db_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Lock timeout as a Duration
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// How often the holder rewrites its heartbeat (timeout / 4)
    pub fn heartbeat_interval(&self) -> Duration {
        Self::fraction(self.lock_timeout_ms, 4)
    }

    /// Sleep between checks of a fresh, held lock (timeout / 500)
    pub fn poll_interval(&self) -> Duration {
        Self::fraction(self.lock_timeout_ms, 500)
    }

    /// Grace period for a sentinel whose heartbeat file is missing (timeout / 250)
    pub fn transient_wait(&self) -> Duration {
        Self::fraction(self.lock_timeout_ms, 250)
    }

    fn fraction(total_ms: u64, divisor: u64) -> Duration {
        Duration::from_millis((total_ms / divisor).max(1))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the database file used when requests do not name one
    pub fn default_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.default_db_path = path.into();
        self
    }

    /// Set the lock timeout (in milliseconds)
    pub fn lock_timeout_ms(mut self, ms: u64) -> Self {
        self.config.lock_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
