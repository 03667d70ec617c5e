use thiserror::Error;

use clientline_store::StoreError;
use clientline_types::{ClientId, ValidationError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("client not found: {0}")]
    NotFound(ClientId),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("event error: {0}")]
    Events(#[from] clientline_events::EventError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => Self::Validation(e),
            other => Self::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Turns a [`ServiceError::NotFound`] into `Ok(None)` for callers that
/// report a missing client as an absent value.
pub trait OptionalExt<T> {
    fn optional(self) -> ServiceResult<Option<T>>;
}

impl<T> OptionalExt<T> for ServiceResult<T> {
    fn optional(self) -> ServiceResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
