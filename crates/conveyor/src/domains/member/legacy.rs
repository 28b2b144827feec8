//! Read-only projection of the legacy `users` table.
//!
//! The legacy schema is not modeled as entities; it is queried through raw
//! statements so the adapter stays insulated from source-side DDL drift.

use chrono::NaiveDateTime;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, Statement};

/// One legacy member row, as the source system stores it.
#[derive(Debug, Clone, FromQueryResult)]
pub struct LegacyMember {
    pub user_id: i64,
    pub email: String,
    pub user_name: String,
    pub phone: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
}

pub(super) async fn count_all(legacy: &DatabaseConnection) -> Result<u64, DbErr> {
    let stmt = Statement::from_string(
        legacy.get_database_backend(),
        "SELECT COUNT(*) AS cnt FROM users",
    );
    let count = match legacy.query_one(stmt).await? {
        Some(row) => row.try_get::<i64>("", "cnt")?,
        None => 0,
    };
    Ok(count as u64)
}

/// Fetch one page of the full table, ordered by primary key so pagination is
/// stable across batches.
pub(super) async fn fetch_page(
    legacy: &DatabaseConnection,
    offset: u64,
    limit: u64,
) -> Result<Vec<LegacyMember>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        legacy.get_database_backend(),
        "SELECT user_id, email, user_name, phone, created_at, modified_at \
         FROM users ORDER BY user_id ASC LIMIT ? OFFSET ?",
        [limit.into(), offset.into()],
    );
    LegacyMember::find_by_statement(stmt).all(legacy).await
}

/// Fetch rows touched after the checkpoint, bounded by `limit`.
pub(super) async fn fetch_modified_since(
    legacy: &DatabaseConnection,
    since: NaiveDateTime,
    limit: u64,
) -> Result<Vec<LegacyMember>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        legacy.get_database_backend(),
        "SELECT user_id, email, user_name, phone, created_at, modified_at \
         FROM users WHERE modified_at > ? ORDER BY modified_at ASC LIMIT ?",
        [since.into(), limit.into()],
    );
    LegacyMember::find_by_statement(stmt).all(legacy).await
}
