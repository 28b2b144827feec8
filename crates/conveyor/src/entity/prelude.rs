//! Common re-exports for convenient entity usage.

pub use super::member::{
    ActiveModel as MemberActiveModel, Column as MemberColumn, Entity as Member,
    Model as MemberModel,
};
pub use super::shipping_address::{
    ActiveModel as ShippingAddressActiveModel, Column as ShippingAddressColumn,
    Entity as ShippingAddress, Model as ShippingAddressModel,
};
pub use super::sync_state::SyncState;
pub use super::sync_status::{
    ActiveModel as SyncStatusActiveModel, Column as SyncStatusColumn, Entity as SyncStatus,
    Model as SyncStatusModel,
};
