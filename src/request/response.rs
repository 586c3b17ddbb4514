//! Response definitions

use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, JsonDbError, Result};

/// Result of one request as seen by the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    /// Subtree at the requested path (`null` when absent)
    Data(Option<Value>),

    /// Structured failure
    Error { kind: ErrorKind, message: String },
}

impl Response {
    pub fn data(value: Option<Value>) -> Self {
        Response::Data(value)
    }

    pub fn error(err: &JsonDbError) -> Self {
        Response::Error {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    /// Render as a JSON value: `{"data": ...}` or `{"error": {...}}`
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Result<Option<Value>>> for Response {
    fn from(result: Result<Option<Value>>) -> Self {
        match result {
            Ok(value) => Response::data(value),
            Err(e) => Response::error(&e),
        }
    }
}
