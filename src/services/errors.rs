use pushkind_common::repository::errors::RepositoryError as CommonRepositoryError;
use pushkind_common::services::errors::ServiceError as CommonServiceError;
use thiserror::Error;
use validator::ValidationErrors;

use crate::forms::FormError;
use crate::pricing::PricingError;
use crate::repository::errors::RepositoryError;

/// Result type returned by every use case.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use case errors. Authentication, missing records and plain form errors
/// are the shared ones; the rest are specific to bookings.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Common(#[from] CommonServiceError),
    #[error("you are not allowed to perform this action")]
    Forbidden,
    /// The request is valid but the current state does not allow it.
    #[error("{0}")]
    Conflict(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn unauthorized() -> Self {
        ServiceError::Common(CommonServiceError::Unauthorized)
    }

    pub fn not_found() -> Self {
        ServiceError::Common(CommonServiceError::NotFound)
    }

    pub fn form(message: impl Into<String>) -> Self {
        ServiceError::Common(CommonServiceError::Form(message.into()))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Common(CommonServiceError::NotFound))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Common(CommonServiceError::Unauthorized))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Common(CommonRepositoryError::NotFound) => ServiceError::not_found(),
            RepositoryError::Common(other) => {
                ServiceError::Internal(format!("storage error: {other}"))
            }
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            RepositoryError::InvalidData(message) => {
                ServiceError::Internal(format!("invalid stored data: {message}"))
            }
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(errors) => ServiceError::Validation(errors),
            other => ServiceError::form(other.to_string()),
        }
    }
}
