//! Member entity - the owner domain in the redesigned schema.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member model - one migrated user account.
///
/// `legacy_member_id` is the remapping key: dependent domains resolve their
/// legacy owner foreign keys through it. `email` is the business natural key
/// used for idempotent writes; legacy numeric ids are not preserved as
/// primary keys across stores.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Primary key of the source row in the legacy `users` table.
    pub legacy_member_id: i64,

    /// Login email. Unique; the idempotency key for member writes.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Phone number, if the legacy row had one.
    pub phone: Option<String>,

    /// Creation instant carried over from the legacy row.
    pub created_at: DateTimeWithTimeZone,
    /// When this row was last written by a sync run.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A member owns its shipping addresses.
    #[sea_orm(has_many = "super::shipping_address::Entity")]
    ShippingAddress,
}

impl Related<super::shipping_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingAddress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
