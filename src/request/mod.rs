//! Request Module
//!
//! Plain-value requests handed to the engine by an outer caller, and the
//! response shape handed back.
//!
//! ## Response Shape
//! ```text
//! { "data": <subtree or null> }
//! { "error": { "kind": "LockTimeout", "message": "..." } }
//! ```

mod command;
mod response;

pub use command::{Operation, Request, WriteSource};
pub use response::Response;
