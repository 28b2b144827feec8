//! Member sync adapter - the owner domain.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entity::member;
use crate::entity::prelude::Member;
use crate::sync::{RecordOutcome, RunTally, SyncError, SyncResult, SyncService};

use super::DOMAIN;
use super::legacy::{self, LegacyMember};
use crate::domains::{from_legacy_timestamp, to_legacy_timestamp};

/// Migrates legacy `users` rows into `members`.
///
/// Idempotency key: `email`. A legacy row whose email already exists in the
/// target is skipped, so replaying any window is safe.
pub struct MemberSyncService {
    legacy: Arc<DatabaseConnection>,
    target: Arc<DatabaseConnection>,
    batch_size: u64,
}

impl MemberSyncService {
    pub fn new(
        legacy: Arc<DatabaseConnection>,
        target: Arc<DatabaseConnection>,
        batch_size: u64,
    ) -> Self {
        Self {
            legacy,
            target,
            batch_size,
        }
    }

    /// Write one legacy member if its natural key is not present yet.
    async fn sync_one(&self, record: &LegacyMember) -> Result<RecordOutcome, DbErr> {
        let existing = Member::find()
            .filter(member::Column::Email.eq(&record.email))
            .one(self.target.as_ref())
            .await?;
        if existing.is_some() {
            return Ok(RecordOutcome::Skipped);
        }

        member::ActiveModel {
            id: Set(Uuid::new_v4()),
            legacy_member_id: Set(record.user_id),
            email: Set(record.email.clone()),
            name: Set(record.user_name.clone()),
            phone: Set(record.phone.clone()),
            created_at: Set(from_legacy_timestamp(record.created_at)),
            synced_at: Set(Utc::now().fixed_offset()),
        }
        .insert(self.target.as_ref())
        .await?;

        Ok(RecordOutcome::Synced)
    }

    /// Run the per-record path over a batch, counting instead of aborting.
    async fn sync_batch(&self, batch: &[LegacyMember], tally: &mut RunTally) {
        for record in batch {
            match self.sync_one(record).await {
                Ok(outcome) => tally.record(outcome),
                Err(err) => {
                    warn!(legacy_id = record.user_id, error = %err, "Failed to sync member");
                    tally.record_failure();
                }
            }
        }
    }
}

#[async_trait]
impl SyncService for MemberSyncService {
    fn domain_name(&self) -> &str {
        DOMAIN
    }

    async fn initial_migration(&self) -> Result<SyncResult, SyncError> {
        let started_at = Utc::now();
        let total = legacy::count_all(&self.legacy).await?;
        info!(domain = DOMAIN, total, "Starting initial migration");

        let mut tally = RunTally::default();
        let mut offset = 0u64;
        loop {
            let batch = legacy::fetch_page(&self.legacy, offset, self.batch_size).await?;
            if batch.is_empty() {
                break;
            }
            let fetched = batch.len() as u64;
            offset += fetched;
            self.sync_batch(&batch, &mut tally).await;
            info!(domain = DOMAIN, processed = offset, total, "Migration progress");
            // A short page is the last page; don't fetch a trailing empty one.
            if fetched < self.batch_size {
                break;
            }
        }

        Ok(tally.into_result(DOMAIN, started_at))
    }

    async fn incremental_sync(
        &self,
        last_sync_at: DateTime<Utc>,
    ) -> Result<SyncResult, SyncError> {
        let started_at = Utc::now();
        let since = to_legacy_timestamp(last_sync_at);
        let batch = legacy::fetch_modified_since(&self.legacy, since, self.batch_size).await?;
        info!(domain = DOMAIN, changed = batch.len(), "Starting incremental sync");

        let mut tally = RunTally::default();
        self.sync_batch(&batch, &mut tally).await;

        Ok(tally.into_result(DOMAIN, started_at))
    }
}
