//! The fixed-period scheduler driving incremental sync runs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, warn};

use crate::status;
use crate::status::StatusError;

use super::registry::SyncRegistry;
use super::types::SyncResult;

/// Default period between scheduler ticks.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Process-wide scheduler service, constructed once at startup.
///
/// Each tick it reads the active `sync_status` rows, decides which domains
/// are due, and runs their incremental path sequentially on the timer task.
/// The scheduler is generic over [`SyncRegistry`]: adding a new domain means
/// registering another service, never touching this loop.
///
/// Ticks never overlap: a slow domain delays the next tick rather than
/// piling runs on top of each other. No cross-process coordination exists -
/// one active scheduler per status store.
pub struct SyncScheduler {
    db: Arc<DatabaseConnection>,
    registry: Arc<SyncRegistry>,
    check_interval: Duration,
}

impl SyncScheduler {
    /// Create a scheduler over the target-store connection holding the
    /// `sync_status` table.
    pub fn new(db: Arc<DatabaseConnection>, registry: Arc<SyncRegistry>) -> Self {
        Self {
            db,
            registry,
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }

    /// Override the tick period (mainly for tests and local runs).
    pub fn with_check_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// Run until the process shuts down.
    ///
    /// A failed tick (e.g. the status store is briefly unreachable) is
    /// logged and retried on the next period; the loop itself never exits.
    pub async fn run(&self) {
        info!(
            domains = self.registry.len(),
            interval_secs = self.check_interval.as_secs(),
            "Sync scheduler started"
        );

        let mut ticker = tokio::time::interval(self.check_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.tick(Utc::now()).await {
                error!(error = %e, "Scheduler tick failed");
            }
        }
    }

    /// One scheduling pass: run every due, registered, enabled domain.
    ///
    /// Exposed for tests and for manual one-shot triggering.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<(), StatusError> {
        debug!("Checking domains for incremental sync");

        let statuses = status::find_all_active(&self.db).await?;

        for row in statuses {
            if !row.needs_sync(now) {
                continue;
            }

            let Some(service) = self.registry.get(&row.domain_name) else {
                // Status rows may outlive decommissioned adapters.
                warn!(
                    domain = %row.domain_name,
                    "No sync service registered for active domain, skipping"
                );
                continue;
            };

            if !service.is_enabled() {
                debug!(domain = %row.domain_name, "Sync service disabled, skipping");
                continue;
            }

            // First incremental run starts from the beginning of time.
            let since = row
                .last_sync_at
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or(DateTime::UNIX_EPOCH);

            info!(
                domain = %row.domain_name,
                since = %since,
                interval_minutes = row.sync_interval_minutes,
                "Starting incremental sync"
            );

            let started_at = Utc::now();
            match service.incremental_sync(since).await {
                Ok(result) => {
                    info!(
                        domain = %row.domain_name,
                        synced = result.synced_count,
                        skipped = result.skipped_count,
                        failed = result.failed_count,
                        duration_ms = result.duration().num_milliseconds(),
                        "Incremental sync completed"
                    );
                    status::update_after_sync(&self.db, &row.domain_name, &result).await?;
                }
                Err(e) => {
                    // Synthesize a failure result so the row is updated and
                    // never left silently stale; the checkpoint stays put so
                    // the next tick replays the same window.
                    let failure =
                        SyncResult::failure(&row.domain_name, started_at, e.to_string());
                    error!(
                        domain = %row.domain_name,
                        error = %e,
                        "Incremental sync aborted"
                    );
                    status::update_after_failure(
                        &self.db,
                        &row.domain_name,
                        failure.error_message.as_deref().unwrap_or("sync aborted"),
                    )
                    .await?;
                }
            }
        }

        Ok(())
    }
}
