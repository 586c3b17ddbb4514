//! Store Module
//!
//! The JSON file behind a database.
//!
//! ## Responsibilities
//! - Load the file (a missing file is an empty object)
//! - Project reads through the path accessor
//! - Apply writes and persist the whole document
//!
//! ## File Format
//! UTF-8 JSON, pretty-printed with one tab per indent level. The root is
//! always an object or an array.
//!
//! The file is rewritten in place, without a temp file and rename. A crash
//! in the middle of a write can leave it truncated.

mod document;

pub use document::{to_pretty_json, Document};
