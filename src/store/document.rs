//! Document load/read/write

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{JsonDbError, Result};
use crate::path::{self, JsonPath};

/// In-memory copy of a database file
#[derive(Debug, Clone)]
pub struct Document {
    /// File this document was loaded from and persists to
    path: PathBuf,

    root: Value,
}

impl Document {
    /// Load `path`, or start from `{}` if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        let root = match fs::read_to_string(path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| JsonDbError::DocumentParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Value::Object(Map::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            root,
        })
    }

    /// Subtree at `path`, if any
    pub fn read(&self, path: &JsonPath) -> Option<&Value> {
        path::get(&self.root, path)
    }

    /// Set (or with `None`, delete) the subtree at `path` and persist
    ///
    /// Returns the subtree now at `path`, or `None` for a delete (an array
    /// delete shifts a neighbour into the slot, which is not the result).
    /// The root path only accepts objects and arrays. On error neither
    /// memory nor disk is changed.
    pub fn write(&mut self, path: &JsonPath, value: Option<Value>) -> Result<Option<Value>> {
        if path.is_root() && !matches!(value, Some(Value::Object(_)) | Some(Value::Array(_))) {
            return Err(JsonDbError::InvalidRootAssignment);
        }

        let deleting = value.is_none();
        let updated = path::set(self.root.clone(), path, value)?;
        self.persist_value(&updated)?;
        self.root = updated;

        tracing::info!(file = %self.path.display(), path = %path, deleting, "Document written");
        if deleting {
            return Ok(None);
        }
        Ok(self.read(path).cloned())
    }

    fn persist_value(&self, root: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, to_pretty_json(root)?)?;
        Ok(())
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serialize with a single tab per indentation level
pub fn to_pretty_json(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| JsonDbError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    Ok(buf)
}
