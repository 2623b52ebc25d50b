//! Storefront domain model.
//!
//! # Responsibility
//! - Define the six persisted record shapes shared by repositories, facades
//!   and the FFI layer.
//!
//! # Invariants
//! - Every record is identified by an SQLite rowid; `0` means "not persisted yet".
//! - Timestamps are Unix epoch milliseconds.

pub mod download_history;
pub mod game;
pub mod purchased_game;
pub mod transaction;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};

/// Id placeholder carried by records that have not been inserted yet.
pub const UNSAVED_ID: i64 = 0;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
