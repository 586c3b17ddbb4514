//! Error types for jsondb
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using JsonDbError
pub type Result<T> = std::result::Result<T, JsonDbError>;

/// Unified error type for jsondb operations
#[derive(Debug, Error)]
pub enum JsonDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lock Errors
    // -------------------------------------------------------------------------
    #[error("The database is being kept locked for too much time ({waited_ms} ms on {}). Try again later.", lock_dir.display())]
    LockTimeout { lock_dir: PathBuf, waited_ms: u64 },

    // -------------------------------------------------------------------------
    // Document Errors
    // -------------------------------------------------------------------------
    #[error("Single item values cannot be assigned to the JSON root.")]
    InvalidRootAssignment,

    #[error("Invalid JSON in {}: {source}", path.display())]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    #[error("Path syntax error at position {position}: {message}")]
    PathSyntax { position: usize, message: String },

    #[error("Array index {index} is too far past the end of an array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Source JSON string is not valid JSON: {0}")]
    SourceParse(#[source] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of an error, exposed to callers in responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    LockTimeout,
    InvalidRootAssignment,
    DocumentParseError,
    PathSyntaxError,
    IndexOutOfRange,
    SourceParseError,
    IOError,
    ConfigError,
}

impl JsonDbError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonDbError::Io(_) => ErrorKind::IOError,
            JsonDbError::LockTimeout { .. } => ErrorKind::LockTimeout,
            JsonDbError::InvalidRootAssignment => ErrorKind::InvalidRootAssignment,
            JsonDbError::DocumentParse { .. } => ErrorKind::DocumentParseError,
            JsonDbError::PathSyntax { .. } => ErrorKind::PathSyntaxError,
            JsonDbError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            JsonDbError::SourceParse(_) => ErrorKind::SourceParseError,
            JsonDbError::Config(_) => ErrorKind::ConfigError,
        }
    }

    pub(crate) fn path_syntax(position: usize, message: impl Into<String>) -> Self {
        JsonDbError::PathSyntax {
            position,
            message: message.into(),
        }
    }
}
