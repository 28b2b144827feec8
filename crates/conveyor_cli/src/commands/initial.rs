//! `--mode initial`: full migration of registered domains.

use conveyor::status;
use tracing::{error, info};

use crate::config::Config;

pub(crate) async fn handle_initial(
    config: &Config,
    target_url: &str,
    domain: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (target, registry) = super::connect_stores(config, target_url).await?;

    if let Some(domain) = domain
        && registry.get(domain).is_none()
    {
        error!(domain, "Unknown domain");
        std::process::exit(1);
    }

    for service in registry.services() {
        let name = service.domain_name();
        if let Some(only) = domain
            && name != only
        {
            continue;
        }
        if !service.is_enabled() {
            info!(domain = name, "Domain disabled, skipping");
            continue;
        }

        match service.initial_migration().await {
            Ok(result) => {
                info!(
                    domain = name,
                    synced = result.synced_count,
                    skipped = result.skipped_count,
                    failed = result.failed_count,
                    "Initial migration finished"
                );
                status::update_after_sync(&target, name, &result).await?;
            }
            Err(err) => {
                // Keep going: one domain's run-level failure must not block
                // the others. The status row records it for the operator.
                error!(domain = name, error = %err, "Initial migration failed");
                status::update_after_failure(&target, name, &err.to_string()).await?;
            }
        }
    }

    Ok(())
}
