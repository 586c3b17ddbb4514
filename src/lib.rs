//! # jsondb
//!
//! A serverless JSON document store:
//! - One JSON file is a hierarchical key-value database
//! - Path expressions address nested locations (`monsters["cookie-monster"].scares`)
//! - Independent processes share the file safely through a directory-based lock
//!   with heartbeat renewal and stale-lock reclamation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Caller (CLI, host glue)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                                │
//! │        acquire → load → read/write → persist → release       │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │   LockManager   │                │    Document     │
//!   │ (~file.lock/ +  │                │  (JSON file)    │
//!   │   heartbeat)    │                └────────┬────────┘
//!   └─────────────────┘                         │
//!                                               ▼
//!                                      ┌─────────────────┐
//!                                      │  Path accessor  │
//!                                      │ (pure get/set)  │
//!                                      └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod path;
pub mod lock;
pub mod store;
pub mod request;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, JsonDbError, Result};
pub use config::Config;
pub use engine::Engine;
pub use path::{JsonPath, PathSegment};
pub use request::{Operation, Request, Response, WriteSource};
pub use store::Document;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsondb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
