//! Repository error types.

use sea_orm::DbErr;
use tally_core::amounts::AmountsError;
use tally_core::statistics::StatisticsError;
use tally_shared::AppError;
use thiserror::Error;

/// Error types for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity does not exist or belongs to another workspace.
    #[error("{entity} {id} is not found")]
    NotFound {
        /// Human readable entity name.
        entity: &'static str,
        /// Requested id.
        id: i64,
    },

    /// Some of the referenced documents do not exist.
    #[error("Documents {0:?} are not found")]
    DocumentsNotFound(Vec<i64>),

    /// Update carried an outdated version.
    #[error("{entity} {id} has been modified concurrently")]
    StaleVersion {
        /// Human readable entity name.
        entity: &'static str,
        /// Updated id.
        id: i64,
    },

    /// Request violates a workspace or field rule.
    #[error("{0}")]
    Validation(String),

    /// Amount calculation rejected the input.
    #[error(transparent)]
    Amounts(#[from] AmountsError),

    /// Statistics request rejected.
    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Shorthand for [`RepositoryError::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } | RepositoryError::DocumentsNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            RepositoryError::StaleVersion { .. } => Self::Conflict(err.to_string()),
            RepositoryError::Statistics(StatisticsError::Overflow) => {
                Self::Internal(err.to_string())
            }
            RepositoryError::Validation(_)
            | RepositoryError::Amounts(_)
            | RepositoryError::Statistics(_) => Self::Validation(err.to_string()),
            RepositoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}
