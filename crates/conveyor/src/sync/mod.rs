//! Generic synchronization framework: the per-domain contract, the registry,
//! and the scheduler that drives incremental runs.
//!
//! # Module Structure
//!
//! - [`types`] - Core values: `SyncResult`, `RecordOutcome`, `RunTally`
//! - [`service`] - The per-domain `SyncService` contract and `SyncError`
//! - [`registry`] - `SyncRegistry`, the domain-name → service map
//! - [`scheduler`] - `SyncScheduler`, the fixed-period tick loop

pub mod registry;
pub mod scheduler;
pub mod service;
pub mod types;

pub use registry::SyncRegistry;
pub use scheduler::{DEFAULT_CHECK_INTERVAL, SyncScheduler};
pub use service::{SyncError, SyncService};
pub use types::{DEFAULT_BATCH_SIZE, RecordOutcome, RunTally, SyncResult};
