//! Path Module
//!
//! Addresses nested locations inside a JSON document.
//!
//! ## Responsibilities
//! - Parse path expressions into typed segments
//! - Read a subtree at a path
//! - Set or delete a subtree at a path, creating intermediate containers
//!
//! ## Syntax
//! ```text
//! monsters["cookie-monster"].scares
//! items[0].name
//! config['a.b'][2]
//! ```
//!
//! Nothing here touches the filesystem or the lock; the accessor is a pure
//! transform over `serde_json::Value`.

mod segment;
mod parser;
mod accessor;

pub use segment::{JsonPath, PathSegment};
pub use parser::parse_path;
pub use accessor::{get, set, MAX_INDEX_GAP};
