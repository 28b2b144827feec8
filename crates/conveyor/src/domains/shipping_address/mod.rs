mod legacy;
mod service;
mod writer;

pub use legacy::LegacyShippingAddress;
pub use service::ShippingAddressSyncService;

/// Domain name as seeded in `sync_status`.
pub const DOMAIN: &str = "shipping_address";
