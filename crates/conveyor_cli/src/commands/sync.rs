//! `--mode sync`: the always-on incremental scheduler.

use std::sync::Arc;
use std::time::Duration;

use conveyor::SyncScheduler;
use tracing::info;

use crate::config::Config;

pub(crate) async fn handle_sync(
    config: &Config,
    target_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (target, registry) = super::connect_stores(config, target_url).await?;
    info!(domains = ?registry.domains(), "Starting incremental sync scheduler");

    super::status::print_status_table(&target).await?;

    let scheduler = SyncScheduler::new(target, Arc::new(registry))
        .with_check_interval(Duration::from_secs(config.sync.check_interval_secs));

    tokio::select! {
        _ = scheduler.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested, stopping scheduler");
        }
    }

    Ok(())
}
