//! Lifecycle state for a domain's sync status row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-domain sync lifecycle state.
///
/// `Paused` domains are never selected by the scheduler but keep their
/// checkpoint; `Completed` is the terminal, operator-set state once cut-over
/// for a domain is done.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SyncState {
    #[sea_orm(string_value = "active")]
    #[default]
    Active,
    #[sea_orm(string_value = "paused")]
    Paused,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncState::Active => write!(f, "active"),
            SyncState::Paused => write!(f, "paused"),
            SyncState::Completed => write!(f, "completed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_active() {
        assert_eq!(SyncState::default(), SyncState::Active);
    }

    #[test]
    fn display_outputs_expected_strings() {
        assert_eq!(SyncState::Active.to_string(), "active");
        assert_eq!(SyncState::Paused.to_string(), "paused");
        assert_eq!(SyncState::Completed.to_string(), "completed");
    }
}
