//! Read-only projection of the legacy `user_shipping_address` table.

use chrono::NaiveDateTime;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, FromQueryResult, Statement};

/// One legacy shipping address row.
///
/// `user_id` is a foreign key into the legacy `users` table; it must be
/// remapped to a target member UUID before the row can be written.
#[derive(Debug, Clone, FromQueryResult)]
pub struct LegacyShippingAddress {
    pub address_id: i64,
    pub user_id: i64,
    pub recipient_name: String,
    pub phone: Option<String>,
    pub zip_code: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub is_default: bool,
    pub created_at: Option<NaiveDateTime>,
    pub modified_at: Option<NaiveDateTime>,
}

const COLUMNS: &str = "address_id, user_id, recipient_name, phone, zip_code, \
                       address_line1, address_line2, is_default, created_at, modified_at";

pub(super) async fn count_all(legacy: &DatabaseConnection) -> Result<u64, DbErr> {
    let stmt = Statement::from_string(
        legacy.get_database_backend(),
        "SELECT COUNT(*) AS cnt FROM user_shipping_address",
    );
    let count = match legacy.query_one(stmt).await? {
        Some(row) => row.try_get::<i64>("", "cnt")?,
        None => 0,
    };
    Ok(count as u64)
}

pub(super) async fn fetch_page(
    legacy: &DatabaseConnection,
    offset: u64,
    limit: u64,
) -> Result<Vec<LegacyShippingAddress>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        legacy.get_database_backend(),
        format!(
            "SELECT {COLUMNS} FROM user_shipping_address \
             ORDER BY address_id ASC LIMIT ? OFFSET ?"
        ),
        [limit.into(), offset.into()],
    );
    LegacyShippingAddress::find_by_statement(stmt).all(legacy).await
}

pub(super) async fn fetch_modified_since(
    legacy: &DatabaseConnection,
    since: NaiveDateTime,
    limit: u64,
) -> Result<Vec<LegacyShippingAddress>, DbErr> {
    let stmt = Statement::from_sql_and_values(
        legacy.get_database_backend(),
        format!(
            "SELECT {COLUMNS} FROM user_shipping_address \
             WHERE modified_at > ? ORDER BY modified_at ASC LIMIT ?"
        ),
        [since.into(), limit.into()],
    );
    LegacyShippingAddress::find_by_statement(stmt).all(legacy).await
}
