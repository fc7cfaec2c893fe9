use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pushkind_common::repository::errors::RepositoryError as CommonRepositoryError;
use thiserror::Error;

use crate::domain::UnknownVariant;

/// Storage errors: the shared ones plus the booking-specific outcomes that
/// callers need to tell apart.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Common(#[from] CommonRepositoryError),
    /// A compare-and-set or calendar check lost against another write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid stored data: {0}")]
    InvalidData(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    pub fn not_found() -> Self {
        RepositoryError::Common(CommonRepositoryError::NotFound)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::Common(CommonRepositoryError::NotFound))
    }
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::not_found(),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info) => {
                RepositoryError::InvalidData(info.message().to_string())
            }
            other => RepositoryError::Common(other.into()),
        }
    }
}

impl From<PoolError> for RepositoryError {
    fn from(value: PoolError) -> Self {
        RepositoryError::Common(value.into())
    }
}

impl From<UnknownVariant> for RepositoryError {
    fn from(value: UnknownVariant) -> Self {
        RepositoryError::InvalidData(value.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(value: serde_json::Error) -> Self {
        RepositoryError::InvalidData(value.to_string())
    }
}
