//! Sync Status Store - durable per-domain scheduling state.
//!
//! This is the only shared mutable resource in the system: one `sync_status`
//! row per domain, read by the scheduler every tick and updated exactly once
//! per run. All updates are single-row, single-statement.

mod errors;
mod store;

pub use errors::{Result, StatusError};
pub use store::{
    find_all, find_all_active, find_by_domain, reset_last_sync_at, update_after_failure,
    update_after_sync, update_state, update_sync_interval,
};
