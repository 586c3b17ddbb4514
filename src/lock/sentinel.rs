//! Sentinel directory and heartbeat file I/O

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the heartbeat file inside the sentinel directory
pub const HEARTBEAT_FILE: &str = "time";

/// Sentinel directory guarding `file`: `~<basename>.lock`, next to it
///
/// "/data/db.json" → "/data/~db.json.lock"
pub fn lock_dir_for(file: &Path) -> PathBuf {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lock_name = format!("~{}.lock", name);
    match file.parent() {
        Some(parent) => parent.join(lock_name),
        None => PathBuf::from(lock_name),
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Handle on a sentinel directory (which may or may not exist)
#[derive(Debug, Clone)]
pub struct Sentinel {
    dir: PathBuf,
}

impl Sentinel {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn heartbeat_path(&self) -> PathBuf {
        self.dir.join(HEARTBEAT_FILE)
    }

    /// Atomically create the sentinel directory
    ///
    /// Returns `Ok(false)` when it already exists (someone else holds the lock).
    /// The parent directory is created first so a brand-new database location
    /// can still be locked.
    pub fn try_create(&self) -> io::Result<bool> {
        if let Some(parent) = self.dir.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        match fs::create_dir(&self.dir) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Write the current time as the heartbeat
    pub fn touch(&self) -> io::Result<()> {
        self.write_heartbeat(now_millis())
    }

    pub fn write_heartbeat(&self, millis: u64) -> io::Result<()> {
        fs::write(self.heartbeat_path(), millis.to_string())
    }

    /// Read the last heartbeat
    ///
    /// Returns `Ok(None)` when the file is missing or does not hold a number
    /// yet, which happens while another process is mid-acquire or mid-release.
    pub fn read_heartbeat(&self) -> io::Result<Option<u64>> {
        match fs::read_to_string(self.heartbeat_path()) {
            Ok(contents) => Ok(contents.trim().parse::<u64>().ok()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Last modification of the sentinel directory in epoch milliseconds
    ///
    /// Stands in for the heartbeat of a sentinel whose holder died before
    /// writing one.
    pub fn modified_millis(&self) -> io::Result<Option<u64>> {
        match fs::metadata(&self.dir) {
            Ok(meta) => Ok(meta
                .modified()?
                .duration_since(UNIX_EPOCH)
                .ok()
                .map(|d| d.as_millis() as u64)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Remove the sentinel and everything in it. Already gone is fine.
    pub fn remove(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
