//! End-to-end pipeline tests: migrations, initial migration, and scheduler
//! ticks against one shared in-memory database that plays both the legacy
//! and the target store.
//!
//! Key scenarios:
//! - Initial migration moves both domains and records checkpoints
//! - A scheduler tick picks up only legacy rows changed past the checkpoint
//! - Dependent rows left unmapped converge after a checkpoint reset

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use conveyor::entity::prelude::{Member, ShippingAddress};
use conveyor::entity::sync_state::SyncState;
use conveyor::sync::SyncScheduler;
use conveyor::{connect_and_migrate, domains, status};
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait};

/// One database, two roles: legacy fixture tables next to the migrated
/// target schema.
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

async fn seed_user(db: &DatabaseConnection, id: i64, modified_at: &str) {
    db.execute_unprepared(&format!(
        "INSERT INTO users (user_id, email, user_name, created_at, modified_at) \
         VALUES ({id}, 'user{id}@example.com', 'user {id}', '2025-01-01 12:00:00', \
         '{modified_at}')"
    ))
    .await
    .expect("seed legacy user");
}

async fn seed_address(db: &DatabaseConnection, id: i64, user_id: i64, modified_at: &str) {
    db.execute_unprepared(&format!(
        "INSERT INTO user_shipping_address \
         (address_id, user_id, recipient_name, zip_code, address_line1, is_default, \
          created_at, modified_at) \
         VALUES ({id}, {user_id}, 'recipient {id}', '0{id:04}', 'street {id}', 0, \
         '2025-01-01 12:00:00', '{modified_at}')"
    ))
    .await
    .expect("seed legacy address");
}

/// What the CLI's initial mode does: run every adapter and record the result.
async fn run_initial(db: &Arc<DatabaseConnection>) {
    let registry =
        domains::registry(Arc::clone(db), Arc::clone(db), 100).expect("registry builds");
    for service in registry.services() {
        let result = service
            .initial_migration()
            .await
            .expect("initial migration runs");
        status::update_after_sync(db, service.domain_name(), &result)
            .await
            .expect("status update");
    }
}

#[tokio::test]
async fn initial_migration_moves_both_domains_and_records_checkpoints() {
    let db = setup().await;
    seed_user(&db, 1, "2025-01-02 09:00:00").await;
    seed_user(&db, 2, "2025-01-02 09:00:00").await;
    seed_address(&db, 1, 1, "2025-01-02 09:00:00").await;
    seed_address(&db, 2, 2, "2025-01-02 09:00:00").await;

    run_initial(&db).await;

    assert_eq!(Member::find().count(db.as_ref()).await.expect("count"), 2);
    assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 2);

    for row in status::find_all(&db).await.expect("status rows") {
        assert!(row.last_sync_at.is_some(), "{} has no checkpoint", row.domain_name);
        assert_eq!(row.last_synced_count, 2);
        assert_eq!(row.total_synced_count, 2);
        assert!(row.error_message.is_none());
    }
}

#[tokio::test]
async fn scheduler_tick_syncs_only_changes_past_the_checkpoint() {
    let db = setup().await;
    seed_user(&db, 1, "2025-01-02 09:00:00").await;
    seed_address(&db, 1, 1, "2025-01-02 09:00:00").await;
    run_initial(&db).await;

    // New legacy activity after the recorded checkpoints
    seed_user(&db, 2, "2030-01-01 09:00:00").await;
    seed_address(&db, 2, 2, "2030-01-01 09:30:00").await;

    let registry = Arc::new(
        domains::registry(db.clone(), db.clone(), 100).expect("registry builds"),
    );
    let scheduler = SyncScheduler::new(db.clone(), registry);

    let far_future = Utc
        .with_ymd_and_hms(2030, 6, 1, 0, 0, 0)
        .single()
        .expect("valid instant");
    scheduler.tick(far_future).await.expect("tick runs");

    assert_eq!(Member::find().count(db.as_ref()).await.expect("count"), 2);
    assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 2);

    let member_row = status::find_by_domain(&db, "member")
        .await
        .expect("query")
        .expect("status row");
    assert_eq!(member_row.last_synced_count, 1);
    assert_eq!(member_row.total_synced_count, 2);
}

#[tokio::test]
async fn reset_replays_unmapped_dependents_until_they_converge() {
    let db = setup().await;
    // The address's owner is missing from the legacy snapshot at first
    seed_address(&db, 1, 7, "2025-01-02 09:00:00").await;
    run_initial(&db).await;

    assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 0);
    let row = status::find_by_domain(&db, "shipping_address")
        .await
        .expect("query")
        .expect("status row");
    let message = row.error_message.expect("unconverged summary");
    assert!(message.contains("unmapped"), "unexpected message: {message}");

    // Owner appears; operator resets the dependent domain's checkpoint
    seed_user(&db, 7, "2025-01-03 09:00:00").await;
    status::reset_last_sync_at(&db, "shipping_address")
        .await
        .expect("reset");

    run_initial(&db).await;

    assert_eq!(ShippingAddress::find().count(db.as_ref()).await.expect("count"), 1);
    let row = status::find_by_domain(&db, "shipping_address")
        .await
        .expect("query")
        .expect("status row");
    assert!(row.error_message.is_none());
}

#[tokio::test]
async fn paused_domain_is_skipped_by_the_scheduler_end_to_end() {
    let db = setup().await;
    seed_user(&db, 1, "2030-01-01 09:00:00").await;
    status::update_state(&db, "member", SyncState::Paused)
        .await
        .expect("pause");

    let registry = Arc::new(
        domains::registry(db.clone(), db.clone(), 100).expect("registry builds"),
    );
    let scheduler = SyncScheduler::new(db.clone(), registry);

    let far_future = Utc
        .with_ymd_and_hms(2030, 6, 1, 0, 0, 0)
        .single()
        .expect("valid instant");
    scheduler.tick(far_future).await.expect("tick runs");

    assert_eq!(Member::find().count(db.as_ref()).await.expect("count"), 0);
}
