//! Request definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JsonDbError, Result};
use crate::path::{self, parse_path};

/// Operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Read,
    Write,
}

/// Where the value of a write comes from
#[derive(Debug, Clone, PartialEq)]
pub enum WriteSource {
    /// Already-extracted value; `None` deletes at the path
    Value(Option<Value>),

    /// Look `key` (itself a path expression) up in a caller-provided context
    /// object. A missing key deletes at the path.
    ContextKey { context: Value, key: String },

    /// Literal JSON text. Blank text deletes at the path.
    JsonLiteral(String),
}

impl WriteSource {
    /// Produce the value to write (`None` = delete)
    pub fn resolve(&self) -> Result<Option<Value>> {
        match self {
            WriteSource::Value(value) => Ok(value.clone()),
            WriteSource::ContextKey { context, key } => {
                let key_path = parse_path(key)?;
                Ok(path::get(context, &key_path).cloned())
            }
            WriteSource::JsonLiteral(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                serde_json::from_str(text)
                    .map(Some)
                    .map_err(JsonDbError::SourceParse)
            }
        }
    }
}

/// One logical request against a database file
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub operation: Operation,

    /// Path expression; blank addresses the root
    pub path: String,

    /// Database file; blank selects the configured default
    pub file_path: String,

    /// Ignored for reads
    pub source: WriteSource,
}

impl Request {
    /// Read `path` from `file_path`
    pub fn read(path: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            operation: Operation::Read,
            path: path.into(),
            file_path: file_path.into(),
            source: WriteSource::Value(None),
        }
    }

    /// Write to `path` in `file_path`
    pub fn write(
        path: impl Into<String>,
        file_path: impl Into<String>,
        source: WriteSource,
    ) -> Self {
        Self {
            operation: Operation::Write,
            path: path.into(),
            file_path: file_path.into(),
            source,
        }
    }
}
