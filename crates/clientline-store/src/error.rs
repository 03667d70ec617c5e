use clientline_types::ValidationError;

/// Errors from client store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document failed the store's schema validation. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backing database could not be reached or rejected the request
    /// for a transient reason.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The adapter itself is in a bad state (e.g. a poisoned lock).
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
