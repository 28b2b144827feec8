//! SyncStatus entity - one durable control row per migrated domain.

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::sync_state::SyncState;

/// SyncStatus model - scheduling checkpoint and counters for one domain.
///
/// Rows are seeded by migration before the first run and never deleted during
/// normal operation. The scheduler mutates a row after every run; operators
/// mutate `status` and `sync_interval_minutes` through the CLI.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_status")]
pub struct Model {
    /// Domain name, e.g. "shipping_address". Unique key for the registry.
    #[sea_orm(primary_key, auto_increment = false)]
    pub domain_name: String,

    /// Checkpoint: completion instant of the last successful run.
    /// NULL until the first run; a NULL checkpoint is always due.
    pub last_sync_at: Option<DateTimeWithTimeZone>,
    /// Records synced by the last run.
    #[sea_orm(default_value = 0)]
    pub last_synced_count: i64,
    /// Lifetime synced count. Observability data, not a correctness
    /// mechanism: re-applying an identical result double-counts it.
    #[sea_orm(default_value = 0)]
    pub total_synced_count: i64,

    /// Lifecycle state driving scheduler eligibility.
    pub status: SyncState,
    /// Minimum minutes between incremental runs.
    pub sync_interval_minutes: i32,

    /// Error summary from the last run, NULL after a clean run.
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    /// Last mutation instant for this row.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Scheduling predicate: is this domain due for an incremental run?
    ///
    /// True iff the domain is `Active` and `now` is strictly past
    /// `last_sync_at + sync_interval_minutes`. A NULL checkpoint means the
    /// domain has never synced and is immediately due.
    pub fn needs_sync(&self, now: DateTime<Utc>) -> bool {
        if self.status != SyncState::Active {
            return false;
        }
        match self.last_sync_at {
            None => true,
            Some(last) => {
                let due_after =
                    last.with_timezone(&Utc) + Duration::minutes(i64::from(self.sync_interval_minutes));
                now > due_after
            }
        }
    }
}
