use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::sync_state::SyncState;
use crate::entity::sync_status::{Column, Entity as SyncStatus, Model};
use crate::sync::SyncResult;

use super::errors::{Result, StatusError};

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Find the status row for a domain.
pub async fn find_by_domain(db: &DatabaseConnection, domain: &str) -> Result<Option<Model>> {
    SyncStatus::find_by_id(domain)
        .one(db)
        .await
        .map_err(StatusError::from)
}

/// Find all status rows, ordered by domain name.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>> {
    SyncStatus::find()
        .order_by_asc(Column::DomainName)
        .all(db)
        .await
        .map_err(StatusError::from)
}

/// Find all `active` status rows, ordered by domain name.
///
/// The ordering makes each scheduler tick deterministic: domains are always
/// visited in the same sequence.
pub async fn find_all_active(db: &DatabaseConnection) -> Result<Vec<Model>> {
    SyncStatus::find()
        .filter(Column::Status.eq(SyncState::Active))
        .order_by_asc(Column::DomainName)
        .all(db)
        .await
        .map_err(StatusError::from)
}

// ─── Updates (single-row, single-statement) ──────────────────────────────────

/// Record a completed run: advance the checkpoint to the run's completion
/// instant, set the last-run count, accumulate the lifetime count, and store
/// the run's error summary (NULL on a clean run).
///
/// Known limitation: `total_synced_count` is incremented unconditionally, so
/// re-applying an identical result double-counts the cumulative counter. The
/// underlying writes stay idempotent; the counter is observability data only.
pub async fn update_after_sync(
    db: &DatabaseConnection,
    domain: &str,
    result: &SyncResult,
) -> Result<()> {
    let res = SyncStatus::update_many()
        .col_expr(
            Column::LastSyncAt,
            Expr::value(Some(result.completed_at.fixed_offset())),
        )
        .col_expr(
            Column::LastSyncedCount,
            Expr::value(result.synced_count as i64),
        )
        .col_expr(
            Column::TotalSyncedCount,
            Expr::col(Column::TotalSyncedCount).add(result.synced_count as i64),
        )
        .col_expr(Column::ErrorMessage, Expr::value(result.error_message.clone()))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(Column::DomainName.eq(domain))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        return Err(StatusError::not_found(domain));
    }
    Ok(())
}

/// Record a run-level failure: the run never produced a real result, so the
/// checkpoint stays where it was and the next tick reprocesses the same
/// window. Only the error text and last-run count are touched, so the row is
/// never silently stale.
pub async fn update_after_failure(
    db: &DatabaseConnection,
    domain: &str,
    error_message: &str,
) -> Result<()> {
    let res = SyncStatus::update_many()
        .col_expr(Column::LastSyncedCount, Expr::value(0i64))
        .col_expr(
            Column::ErrorMessage,
            Expr::value(Some(error_message.to_string())),
        )
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(Column::DomainName.eq(domain))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        return Err(StatusError::not_found(domain));
    }
    Ok(())
}

/// Transition a domain's lifecycle state (pause / resume / complete).
pub async fn update_state(
    db: &DatabaseConnection,
    domain: &str,
    state: SyncState,
) -> Result<()> {
    let res = SyncStatus::update_many()
        .col_expr(Column::Status, Expr::value(state))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(Column::DomainName.eq(domain))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        return Err(StatusError::not_found(domain));
    }
    Ok(())
}

/// Change the minimum minutes between incremental runs for a domain.
pub async fn update_sync_interval(
    db: &DatabaseConnection,
    domain: &str,
    minutes: i32,
) -> Result<()> {
    let res = SyncStatus::update_many()
        .col_expr(Column::SyncIntervalMinutes, Expr::value(minutes))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(Column::DomainName.eq(domain))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        return Err(StatusError::not_found(domain));
    }
    Ok(())
}

/// Clear a domain's checkpoint so the next tick treats it as due and
/// reprocesses from the beginning of time. Operator escape hatch for records
/// stuck in the unmapped state.
pub async fn reset_last_sync_at(db: &DatabaseConnection, domain: &str) -> Result<()> {
    let res = SyncStatus::update_many()
        .col_expr(
            Column::LastSyncAt,
            Expr::value(None::<chrono::DateTime<chrono::FixedOffset>>),
        )
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
        .filter(Column::DomainName.eq(domain))
        .exec(db)
        .await?;

    if res.rows_affected == 0 {
        return Err(StatusError::not_found(domain));
    }
    Ok(())
}
