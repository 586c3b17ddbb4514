//! Engine Module
//!
//! Runs one logical request end to end.
//!
//! ## Responsibilities
//! - Resolve the target file (blank → configured default)
//! - Decide whether the request needs the lock
//! - Hold the lock across load → read/write → persist
//! - Give the lock back on every exit path, including errors

use std::path::PathBuf;

use serde_json::Value;

use crate::config::Config;
use crate::error::Result;
use crate::lock::{should_lock, LockManager};
use crate::path::parse_path;
use crate::request::{Operation, Request, Response};
use crate::store::Document;

/// The request orchestrator
///
/// ## Concurrency Model
///
/// The engine keeps no document state between requests. Everything shared
/// lives on disk (the data file and its sentinel directory), so any number of
/// engines in any number of processes can target the same file; the sentinel
/// lock serializes them. Waiters are not queued in arrival order.
pub struct Engine {
    config: Config,
}

impl Engine {
    /// Create an engine, validating the config
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Execute a request, returning the subtree at its path
    ///
    /// Steps:
    /// 1. Resolve the file and parse the path (before touching any lock)
    /// 2. Acquire the lock if needed; a timeout aborts with the file untouched
    /// 3. Load, then read or write
    /// 4. Release the lock (the guard also releases on early return)
    pub fn execute(&self, request: Request) -> Result<Option<Value>> {
        // Step 1: Everything that can fail without I/O happens up front
        let file = self.resolve_file_path(&request.file_path);
        let path = parse_path(&request.path)?;
        let value = match request.operation {
            Operation::Write => request.source.resolve()?,
            Operation::Read => None,
        };

        // Step 2: Lock if the file exists, or if we may create it
        if !should_lock(file.exists(), request.operation) {
            tracing::debug!(file = %file.display(), "Read of missing file, no lock needed");
            let document = Document::load(&file)?;
            return Ok(document.read(&path).cloned());
        }

        let manager = LockManager::for_file(&self.config, &file);
        let guard = manager.acquire()?;

        // Step 3: Protected section
        let result = Document::load(&file).and_then(|mut document| match request.operation {
            Operation::Read => Ok(document.read(&path).cloned()),
            Operation::Write => document.write(&path, value),
        });

        // Step 4: Release; the operation's error wins over a release error
        let released = guard.release();
        let value = result?;
        released?;
        Ok(value)
    }

    /// Execute a request and fold the outcome into a response
    pub fn respond(&self, request: Request) -> Response {
        Response::from(self.execute(request))
    }

    /// Execute requests in order, each with its own lock cycle
    ///
    /// With `continue_on_fail`, a failed request becomes an error response
    /// and the rest still run; otherwise the first error is returned.
    pub fn execute_all(
        &self,
        requests: impl IntoIterator<Item = Request>,
        continue_on_fail: bool,
    ) -> Result<Vec<Response>> {
        let mut responses = Vec::new();
        for (index, request) in requests.into_iter().enumerate() {
            match self.execute(request) {
                Ok(value) => responses.push(Response::data(value)),
                Err(e) if continue_on_fail => {
                    tracing::warn!(index, error = %e, "Request failed, continuing");
                    responses.push(Response::error(&e));
                }
                Err(e) => return Err(e),
            }
        }
        Ok(responses)
    }

    /// File a request targets: its own path, or the default when blank
    pub fn resolve_file_path(&self, file_path: &str) -> PathBuf {
        let trimmed = file_path.trim();
        if trimmed.is_empty() {
            self.config.default_db_path.clone()
        } else {
            PathBuf::from(trimmed)
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
