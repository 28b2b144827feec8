//! Domain sync adapters: one module per migrated business entity.
//!
//! Each adapter composes a legacy reader (raw-SQL projections of the source
//! schema) and a target writer (idempotent, key-remapping inserts through
//! the entity layer), and exposes them as a [`SyncService`].
//!
//! The owner domain (`member`) must run ahead of its dependents: a
//! `shipping_address` record stays unmapped until its owning member exists
//! in the target store.

pub mod member;
pub mod shipping_address;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use sea_orm::prelude::DateTimeWithTimeZone;
use std::sync::Arc;

use crate::sync::{SyncError, SyncRegistry};

/// Build the registry from the statically-known adapter list.
///
/// Connections are shared as `Arc` handles; every adapter holds the same
/// pair. This is the only place that enumerates domains; the scheduler and
/// CLI are generic over the result.
pub fn registry(
    legacy: Arc<DatabaseConnection>,
    target: Arc<DatabaseConnection>,
    batch_size: u64,
) -> Result<SyncRegistry, SyncError> {
    let mut registry = SyncRegistry::new();
    registry.register(Arc::new(member::MemberSyncService::new(
        Arc::clone(&legacy),
        Arc::clone(&target),
        batch_size,
    )))?;
    registry.register(Arc::new(
        shipping_address::ShippingAddressSyncService::new(legacy, target, batch_size),
    ))?;
    Ok(registry)
}

/// The legacy store keeps naive local datetimes in KST (UTC+9, no DST).
fn legacy_zone() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("UTC+9 is a valid fixed offset")
}

/// Convert a legacy timestamp to the target store's instant representation.
/// Missing legacy timestamps default to "now".
pub(crate) fn from_legacy_timestamp(naive: Option<NaiveDateTime>) -> DateTimeWithTimeZone {
    match naive.and_then(|n| legacy_zone().from_local_datetime(&n).single()) {
        Some(instant) => instant.with_timezone(&Utc).fixed_offset(),
        None => Utc::now().fixed_offset(),
    }
}

/// Convert a checkpoint instant into the legacy store's local representation
/// for `modified_at > ?` comparisons.
pub(crate) fn to_legacy_timestamp(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&legacy_zone()).naive_local()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Timelike};

    use super::*;

    #[tokio::test]
    async fn registry_holds_the_known_domains_in_order() {
        let db = Arc::new(
            crate::db::connect("sqlite::memory:")
                .await
                .expect("in-memory database"),
        );
        let registry = registry(Arc::clone(&db), db, 100).expect("registry builds");
        assert_eq!(registry.domains(), vec!["member", "shipping_address"]);
    }

    #[test]
    fn legacy_timestamps_are_shifted_out_of_kst() {
        let naive = NaiveDate::from_ymd_opt(2025, 6, 1)
            .expect("valid date")
            .and_hms_opt(9, 0, 0)
            .expect("valid time");

        let converted = from_legacy_timestamp(Some(naive));

        // 09:00 KST is midnight UTC
        let expected = Utc
            .with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(converted.with_timezone(&Utc), expected);
    }

    #[test]
    fn missing_legacy_timestamp_defaults_to_now() {
        let before = Utc::now();
        let converted = from_legacy_timestamp(None).with_timezone(&Utc);
        let after = Utc::now();
        assert!(converted >= before && converted <= after);
    }

    #[test]
    fn checkpoint_round_trips_through_legacy_zone() {
        let instant = Utc
            .with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
            .single()
            .expect("valid instant");

        let local = to_legacy_timestamp(instant);
        assert_eq!(local.hour(), 9);
        assert_eq!(from_legacy_timestamp(Some(local)).with_timezone(&Utc), instant);
    }
}
