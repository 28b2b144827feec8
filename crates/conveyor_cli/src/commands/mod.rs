pub(crate) mod control;
pub(crate) mod initial;
pub(crate) mod status;
pub(crate) mod sync;

use std::sync::Arc;

use conveyor::{SyncRegistry, connect, connect_and_migrate};
use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Open both stores and build the domain registry.
///
/// The target is migrated on connect; the legacy store is opened read-only
/// in spirit (conveyor never writes to it) and its URL has no default.
pub(crate) async fn connect_stores(
    config: &Config,
    target_url: &str,
) -> Result<(Arc<DatabaseConnection>, SyncRegistry), Box<dyn std::error::Error>> {
    let legacy_url = match config.legacy_url() {
        Some(url) => url,
        None => {
            tracing::error!(
                "No legacy database URL configured (set CONVEYOR_LEGACY_URL or [legacy] url)"
            );
            std::process::exit(1);
        }
    };

    let legacy = Arc::new(connect(&legacy_url).await?);
    let target = Arc::new(connect_and_migrate(target_url).await?);
    let registry =
        conveyor::domains::registry(legacy, Arc::clone(&target), config.sync.batch_size)?;
    Ok((target, registry))
}
