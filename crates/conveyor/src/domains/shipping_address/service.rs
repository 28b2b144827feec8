//! Shipping address sync adapter - the reference dependent domain.
//!
//! Unlike members, these rows carry a legacy foreign key that must be
//! remapped through the already-migrated owner. A row whose owner is not in
//! the target yet is counted as unconverged and picked up again on a later
//! pass, once the member domain has caught up.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::{debug, info, warn};

use crate::sync::{RecordOutcome, RunTally, SyncError, SyncResult, SyncService};

use super::DOMAIN;
use super::legacy::{self, LegacyShippingAddress};
use super::writer;
use crate::domains::to_legacy_timestamp;

/// Migrates legacy `user_shipping_address` rows into `shipping_addresses`.
///
/// Idempotency key: `(member_id, zip_code, address_line1)`.
pub struct ShippingAddressSyncService {
    legacy: Arc<DatabaseConnection>,
    target: Arc<DatabaseConnection>,
    batch_size: u64,
}

impl ShippingAddressSyncService {
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

    async fn sync_one(&self, record: &LegacyShippingAddress) -> Result<RecordOutcome, DbErr> {
        let Some(member_id) = writer::resolve_member_id(&self.target, record.user_id).await?
        else {
            debug!(
                legacy_id = record.address_id,
                legacy_user_id = record.user_id,
                "Owner not migrated yet, leaving address for a later pass"
            );
            return Ok(RecordOutcome::Unmapped);
        };

        if writer::exists(&self.target, member_id, record).await? {
            return Ok(RecordOutcome::Skipped);
        }

        writer::insert(&self.target, member_id, record).await?;
        Ok(RecordOutcome::Synced)
    }

    async fn sync_batch(&self, batch: &[LegacyShippingAddress], tally: &mut RunTally) {
        for record in batch {
            match self.sync_one(record).await {
                Ok(outcome) => tally.record(outcome),
                Err(err) => {
                    warn!(
                        legacy_id = record.address_id,
                        error = %err,
                        "Failed to sync shipping address"
                    );
                    tally.record_failure();
                }
            }
        }
    }
}

#[async_trait]
impl SyncService for ShippingAddressSyncService {
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

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::{
        ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, MockDatabase,
        PaginatorTrait, QueryFilter, Value,
    };

    use crate::db::connect_and_migrate;
    use crate::domains::member::MemberSyncService;
    use crate::entity::member;
    use crate::entity::prelude::{Member, ShippingAddress};

    use super::*;

    async fn setup() -> Arc<DatabaseConnection> {
        let db = connect_and_migrate("sqlite::memory:")
            .await
            .expect("in-memory database");
        db.execute_unprepared(
            "CREATE TABLE users (
                user_id INTEGER PRIMARY KEY,
                email TEXT NOT NULL,
                user_name TEXT NOT NULL,
                phone TEXT,
                created_at TEXT,
                modified_at TEXT
            )",
        )
        .await
        .expect("legacy users fixture");
        db.execute_unprepared(
            "CREATE TABLE user_shipping_address (
                address_id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                recipient_name TEXT NOT NULL,
                phone TEXT,
                zip_code TEXT NOT NULL,
                address_line1 TEXT NOT NULL,
                address_line2 TEXT,
                is_default INTEGER NOT NULL DEFAULT 0,
                created_at TEXT,
                modified_at TEXT
            )",
        )
        .await
        .expect("legacy addresses fixture");
        Arc::new(db)
    }

    async fn seed_user(db: &DatabaseConnection, id: i64, email: &str) {
        db.execute_unprepared(&format!(
            "INSERT INTO users (user_id, email, user_name, created_at, modified_at) \
             VALUES ({id}, '{email}', 'user {id}', '2025-01-01 12:00:00', '2025-01-02 09:00:00')"
        ))
        .await
        .expect("seed legacy user");
    }

    async fn seed_address(db: &DatabaseConnection, id: i64, user_id: i64, zip: &str) {
        db.execute_unprepared(&format!(
            "INSERT INTO user_shipping_address \
             (address_id, user_id, recipient_name, zip_code, address_line1, is_default, \
              created_at, modified_at) \
             VALUES ({id}, {user_id}, 'recipient {id}', '{zip}', 'line one {id}', 1, \
             '2025-01-01 12:00:00', '2025-01-02 09:00:00')"
        ))
        .await
        .expect("seed legacy address");
    }

    async fn migrate_members(db: &Arc<DatabaseConnection>) {
        MemberSyncService::new(Arc::clone(db), Arc::clone(db), 100)
            .initial_migration()
            .await
            .expect("member migration");
    }

    #[tokio::test]
    async fn addresses_are_remapped_to_target_member_ids() {
        let db = setup().await;
        seed_user(&db, 7, "owner@example.com").await;
        seed_address(&db, 1, 7, "04524").await;
        migrate_members(&db).await;

        let service = ShippingAddressSyncService::new(db.clone(), db.clone(), 10);
        let result = service.initial_migration().await.expect("migration runs");

        assert_eq!(result.synced_count, 1);
        assert!(result.is_successful());

        let owner = Member::find()
            .filter(member::Column::LegacyMemberId.eq(7i64))
            .one(db.as_ref())
            .await
            .expect("query")
            .expect("owner row");
        let address = ShippingAddress::find()
            .one(db.as_ref())
            .await
            .expect("query")
            .expect("address row");
        assert_eq!(address.member_id, owner.id);
        assert!(address.is_default);
    }

    #[tokio::test]
    async fn replaying_skips_addresses_already_present() {
        let db = setup().await;
        seed_user(&db, 7, "owner@example.com").await;
        seed_address(&db, 1, 7, "04524").await;
        migrate_members(&db).await;

        let service = ShippingAddressSyncService::new(db.clone(), db.clone(), 10);
        service.initial_migration().await.expect("first run");
        let second = service.initial_migration().await.expect("second run");

        assert_eq!(second.synced_count, 0);
        assert_eq!(second.skipped_count, 1);
        assert_eq!(
            ShippingAddress::find().count(db.as_ref()).await.expect("count"),
            1
        );
    }

    #[tokio::test]
    async fn unmapped_owner_counts_as_unconverged_not_as_an_abort() {
        let db = setup().await;
        seed_user(&db, 7, "owner@example.com").await;
        seed_address(&db, 1, 7, "04524").await;
        // owner 99 never migrated
        seed_address(&db, 2, 99, "06236").await;
        migrate_members(&db).await;

        let service = ShippingAddressSyncService::new(db.clone(), db.clone(), 10);
        let result = service.initial_migration().await.expect("migration runs");

        assert_eq!(result.synced_count, 1);
        assert_eq!(result.failed_count, 1);
        assert!(!result.is_successful());
        let message = result.error_message.expect("summary message");
        assert!(message.contains("1 unmapped"), "unexpected message: {message}");
    }

    #[tokio::test]
    async fn stale_dependent_converges_once_the_owner_arrives() {
        let db = setup().await;
        seed_user(&db, 7, "late@example.com").await;
        seed_address(&db, 1, 7, "04524").await;

        // first pass runs before the owner domain has migrated anything
        let service = ShippingAddressSyncService::new(db.clone(), db.clone(), 10);
        let first = service.initial_migration().await.expect("first run");
        assert_eq!(first.failed_count, 1);
        assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 0);

        migrate_members(&db).await;
        let second = service.initial_migration().await.expect("second run");

        assert_eq!(second.synced_count, 1);
        assert!(second.is_successful());
        assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn incremental_sync_ignores_rows_before_the_checkpoint() {
        let db = setup().await;
        seed_user(&db, 7, "owner@example.com").await;
        seed_address(&db, 1, 7, "04524").await;
        db.execute_unprepared(
            "UPDATE user_shipping_address SET modified_at = '2024-01-01 00:00:00' \
             WHERE address_id = 1",
        )
        .await
        .expect("age the row");
        migrate_members(&db).await;

        let service = ShippingAddressSyncService::new(db.clone(), db.clone(), 10);
        let result = service
            .incremental_sync(Utc::now())
            .await
            .expect("sync runs");

        assert!(result.is_successful());
        assert_eq!(result.total_processed(), 0);
        assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn same_place_for_different_owners_is_not_deduplicated() {
        let db = setup().await;
        seed_user(&db, 1, "a@example.com").await;
        seed_user(&db, 2, "b@example.com").await;
        // identical zip and street, different owners
        db.execute_unprepared(
            "INSERT INTO user_shipping_address \
             (address_id, user_id, recipient_name, zip_code, address_line1, is_default, \
              created_at, modified_at) VALUES \
             (1, 1, 'a', '04524', 'shared street 1', 0, '2025-01-01 12:00:00', '2025-01-02 09:00:00'), \
             (2, 2, 'b', '04524', 'shared street 1', 0, '2025-01-01 12:00:00', '2025-01-02 09:00:00')",
        )
        .await
        .expect("seed shared addresses");
        migrate_members(&db).await;

        let service = ShippingAddressSyncService::new(db.clone(), db.clone(), 10);
        let result = service.initial_migration().await.expect("migration runs");

        assert_eq!(result.synced_count, 2);
        assert_eq!(
            ShippingAddress::find().count(db.as_ref()).await.expect("count"),
            2
        );
    }

    fn mock_address_row(id: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("address_id", Value::BigInt(Some(id))),
            ("user_id", Value::BigInt(Some(id))),
            (
                "recipient_name",
                Value::String(Some(Box::new(format!("recipient {id}")))),
            ),
            ("phone", Value::String(None)),
            ("zip_code", Value::String(Some(Box::new(format!("0{id:04}"))))),
            (
                "address_line1",
                Value::String(Some(Box::new(format!("street {id}")))),
            ),
            ("address_line2", Value::String(None)),
            ("is_default", Value::Bool(Some(false))),
            ("created_at", Value::ChronoDateTime(None)),
            ("modified_at", Value::ChronoDateTime(None)),
        ])
    }

    #[tokio::test]
    async fn short_final_page_ends_pagination_without_an_extra_fetch() {
        let target = setup().await;
        // 25 rows, batch size 10: the short third page ends the run, so the
        // source sees one count and exactly three page queries.
        let legacy = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([vec![BTreeMap::from([(
                    "cnt",
                    Value::BigInt(Some(25)),
                )])]])
                .append_query_results([
                    (1..=10).map(mock_address_row).collect::<Vec<_>>(),
                    (11..=20).map(mock_address_row).collect::<Vec<_>>(),
                    (21..=25).map(mock_address_row).collect::<Vec<_>>(),
                ])
                .into_connection(),
        );

        let service = ShippingAddressSyncService::new(Arc::clone(&legacy), target, 10);
        let result = service.initial_migration().await.expect("migration runs");
        // no members were migrated, so every row is unconverged, not an abort
        assert_eq!(result.total_processed(), 25);

        drop(service);
        let log = Arc::try_unwrap(legacy)
            .expect("sole owner of the mock connection")
            .into_transaction_log();
        assert_eq!(log.len(), 4);
    }
}
