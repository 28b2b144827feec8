//! ShippingAddress entity - the reference dependent domain.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// ShippingAddress model - one migrated delivery address.
///
/// The idempotency key is the natural composite
/// `(member_id, zip_code, address_line1)`: the same place for the same owner
/// is the same address, regardless of which store it came from.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shipping_addresses")]
pub struct Model {
    /// Internal UUID primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning member in the target store (remapped from the legacy user id).
    pub member_id: Uuid,

    /// Recipient name printed on the parcel.
    pub recipient_name: String,
    /// Contact phone for the courier.
    pub phone: Option<String>,
    /// Postal code.
    pub zip_code: String,
    /// Street address.
    pub address_line1: String,
    /// Apartment / unit detail.
    pub address_line2: Option<String>,
    /// Whether this is the member's default address.
    #[sea_orm(default_value = false)]
    pub is_default: bool,

    /// Creation instant carried over from the legacy row.
    pub created_at: DateTimeWithTimeZone,
    /// When this row was last written by a sync run.
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// An address belongs to a member.
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
