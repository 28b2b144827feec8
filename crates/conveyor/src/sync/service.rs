//! The per-domain synchronization contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use thiserror::Error;

use super::types::SyncResult;

/// Errors that abort a sync run before it can produce a real result.
///
/// Record-level problems never surface here - adapters catch them, count
/// them, and keep going. This type is for run-level failures: the legacy
/// store is unreachable, a batch fetch died, a domain was registered twice.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Database error from either store.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Two services were registered under the same domain name.
    #[error("Domain '{domain}' is already registered")]
    DuplicateDomain { domain: String },
}

/// Per-domain sync strategy. One implementation per business entity.
///
/// Both migration paths are idempotent: re-invoking them on the same data is
/// safe, and callers never deduplicate externally. A failing record must not
/// abort its batch - it is counted in the result and the batch continues.
#[async_trait]
pub trait SyncService: Send + Sync {
    /// Stable identifier matching the `sync_status` row's key. Unique across
    /// all registered services.
    fn domain_name(&self) -> &str;

    /// Full-table pass over the legacy source, batch by batch. Used once at
    /// domain onboarding or on explicit replay.
    async fn initial_migration(&self) -> Result<SyncResult, SyncError>;

    /// Process only records changed after `last_sync_at`, bounded by the
    /// batch size, through the same idempotent write path.
    async fn incremental_sync(&self, last_sync_at: DateTime<Utc>)
    -> Result<SyncResult, SyncError>;

    /// Whether this adapter should run. A registered-but-disabled adapter
    /// stays inert, e.g. during a controlled rollout.
    fn is_enabled(&self) -> bool {
        true
    }
}
