//! Operator controls: pause, resume, reset, set-interval.
//!
//! These touch only the `sync_status` row; they never open the legacy store.
//! Argument problems surface as [`ControlError`] so main can turn them into
//! an exit code; nothing is written before the arguments check out.

use conveyor::entity::sync_state::SyncState;
use conveyor::{StatusError, connect, status};
use sea_orm::DatabaseConnection;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub(crate) enum ControlError {
    #[error("this mode requires --domain")]
    MissingDomain,
    #[error("set-interval requires --interval")]
    MissingInterval,
    #[error("--interval must be a positive number of minutes")]
    NonPositiveInterval,
    #[error("unknown domain: {0}")]
    UnknownDomain(String),
    #[error(transparent)]
    Store(StatusError),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

impl ControlError {
    /// Operator mistakes, as opposed to store failures.
    pub(crate) fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::MissingDomain
                | Self::MissingInterval
                | Self::NonPositiveInterval
                | Self::UnknownDomain(_)
        )
    }
}

impl From<StatusError> for ControlError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::NotFound { domain } => Self::UnknownDomain(domain),
            other => Self::Store(other),
        }
    }
}

fn require_domain(domain: Option<&str>) -> Result<&str, ControlError> {
    domain.ok_or(ControlError::MissingDomain)
}

pub(crate) async fn pause(
    target: &DatabaseConnection,
    domain: Option<&str>,
) -> Result<(), ControlError> {
    let domain = require_domain(domain)?;
    status::update_state(target, domain, SyncState::Paused).await?;
    info!(domain, "Sync paused");
    Ok(())
}

pub(crate) async fn resume(
    target: &DatabaseConnection,
    domain: Option<&str>,
) -> Result<(), ControlError> {
    let domain = require_domain(domain)?;
    status::update_state(target, domain, SyncState::Active).await?;
    info!(domain, "Sync resumed");
    Ok(())
}

pub(crate) async fn reset(
    target: &DatabaseConnection,
    domain: Option<&str>,
) -> Result<(), ControlError> {
    let domain = require_domain(domain)?;
    status::reset_last_sync_at(target, domain).await?;
    info!(domain, "Checkpoint cleared; next run replays from the beginning");
    Ok(())
}

pub(crate) async fn set_interval(
    target: &DatabaseConnection,
    domain: Option<&str>,
    interval: Option<i32>,
) -> Result<(), ControlError> {
    let domain = require_domain(domain)?;
    let minutes = match interval {
        Some(minutes) if minutes > 0 => minutes,
        Some(_) => return Err(ControlError::NonPositiveInterval),
        None => return Err(ControlError::MissingInterval),
    };

    status::update_sync_interval(target, domain, minutes).await?;
    info!(domain, minutes, "Sync interval updated");
    Ok(())
}

pub(crate) async fn handle_pause(
    target_url: &str,
    domain: Option<&str>,
) -> Result<(), ControlError> {
    pause(&connect(target_url).await?, domain).await
}

pub(crate) async fn handle_resume(
    target_url: &str,
    domain: Option<&str>,
) -> Result<(), ControlError> {
    resume(&connect(target_url).await?, domain).await
}

pub(crate) async fn handle_reset(
    target_url: &str,
    domain: Option<&str>,
) -> Result<(), ControlError> {
    reset(&connect(target_url).await?, domain).await
}

pub(crate) async fn handle_set_interval(
    target_url: &str,
    domain: Option<&str>,
    interval: Option<i32>,
) -> Result<(), ControlError> {
    set_interval(&connect(target_url).await?, domain, interval).await
}
