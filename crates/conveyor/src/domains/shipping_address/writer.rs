//! Key-remapping writes into the `shipping_addresses` table.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::member;
use crate::entity::prelude::{Member, ShippingAddress};
use crate::entity::shipping_address;

use super::legacy::LegacyShippingAddress;
use crate::domains::from_legacy_timestamp;

/// Map a legacy user id to the target member UUID, if the owner has been
/// migrated.
pub(super) async fn resolve_member_id(
    target: &DatabaseConnection,
    legacy_user_id: i64,
) -> Result<Option<Uuid>, DbErr> {
    let owner = Member::find()
        .filter(member::Column::LegacyMemberId.eq(legacy_user_id))
        .one(target)
        .await?;
    Ok(owner.map(|m| m.id))
}

/// Natural-key existence check: same owner, same postal code, same street.
pub(super) async fn exists(
    target: &DatabaseConnection,
    member_id: Uuid,
    record: &LegacyShippingAddress,
) -> Result<bool, DbErr> {
    let count = ShippingAddress::find()
        .filter(shipping_address::Column::MemberId.eq(member_id))
        .filter(shipping_address::Column::ZipCode.eq(&record.zip_code))
        .filter(shipping_address::Column::AddressLine1.eq(&record.address_line1))
        .count(target)
        .await?;
    Ok(count > 0)
}

pub(super) async fn insert(
    target: &DatabaseConnection,
    member_id: Uuid,
    record: &LegacyShippingAddress,
) -> Result<(), DbErr> {
    shipping_address::ActiveModel {
        id: Set(Uuid::new_v4()),
        member_id: Set(member_id),
        recipient_name: Set(record.recipient_name.clone()),
        phone: Set(record.phone.clone()),
        zip_code: Set(record.zip_code.clone()),
        address_line1: Set(record.address_line1.clone()),
        address_line2: Set(record.address_line2.clone()),
        is_default: Set(record.is_default),
        created_at: Set(from_legacy_timestamp(record.created_at)),
        synced_at: Set(Utc::now().fixed_offset()),
    }
    .insert(target)
    .await?;
    Ok(())
}
