mod legacy;
mod service;

pub use legacy::LegacyMember;
pub use service::MemberSyncService;

/// Domain name as seeded in `sync_status`.
pub const DOMAIN: &str = "member";
