//! Lock Module
//!
//! Cross-process mutual exclusion for one data file, without a daemon and
//! without OS advisory-lock syscalls.
//!
//! ## Protocol
//! ```text
//!   data file:  /dir/db.json
//!   sentinel:   /dir/~db.json.lock/        (mkdir is the atomic test-and-set)
//!   heartbeat:  /dir/~db.json.lock/time    (epoch millis, rewritten every timeout/4)
//! ```
//!
//! ## State Machine
//! `Unlocked → Acquiring → Held → Releasing → Unlocked`
//!
//! A sentinel whose heartbeat is at least one timeout old belongs to a dead
//! holder and is reclaimed. Reading the heartbeat and removing the sentinel
//! are two separate steps, so two waiters can both reclaim the same stale
//! lock. That window is accepted.
//!
//! Release does not check ownership either. A holder that stalls past the
//! timeout gets reclaimed, and its later release removes the new owner's
//! sentinel. This is the same accepted window, seen from the stalled side.

mod sentinel;
mod heartbeat;
mod manager;

pub use sentinel::{lock_dir_for, now_millis, Sentinel, HEARTBEAT_FILE};
pub use heartbeat::Heartbeat;
pub use manager::{should_lock, LockGuard, LockManager, LockState};
