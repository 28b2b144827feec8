use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur during status store operations.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// No status row exists for the domain.
    #[error("No sync status row for domain '{domain}'")]
    NotFound { domain: String },
}

impl StatusError {
    /// Create a NotFound error for a domain lookup.
    pub fn not_found(domain: &str) -> Self {
        Self::NotFound {
            domain: domain.to_string(),
        }
    }
}

/// Result type alias for status store operations.
pub type Result<T> = std::result::Result<T, StatusError>;
