//! Typed path segments

use std::fmt;
use std::str::FromStr;

use crate::error::JsonDbError;

/// A single step into a JSON tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object key: `.foo` or `["foo"]`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
}

impl PathSegment {
    /// Object key this segment addresses (indices use their decimal form)
    pub fn as_key(&self) -> String {
        match self {
            PathSegment::Key(k) => k.clone(),
            PathSegment::Index(i) => i.to_string(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) if is_identifier(k) => write!(f, ".{}", k),
            PathSegment::Key(k) => {
                write!(f, "[\"{}\"]", k.replace('\\', "\\\\").replace('"', "\\\""))
            }
            PathSegment::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// A parsed path expression. The empty path addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The root path (empty)
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for JsonPath {
    type Err = JsonDbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse_path(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::new();
        for segment in &self.segments {
            rendered.push_str(&segment.to_string());
        }
        f.write_str(rendered.strip_prefix('.').unwrap_or(&rendered))
    }
}

/// Keys that can be written bare in dotted form
fn is_identifier(key: &str) -> bool {
    !key.is_empty()
        && !key.bytes().all(|b| b.is_ascii_digit())
        && key.chars().all(|c| !matches!(c, '.' | '[' | ']' | '"' | '\'') && !c.is_whitespace())
}
