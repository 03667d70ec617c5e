use thiserror::Error;

/// Field-level constraint failures on client documents and their inputs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be at least {min} characters long, got {actual}")]
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("{0} is not a valid phone number")]
    InvalidPhoneNumber(String),

    #[error("invalid client id: {0}")]
    InvalidClientId(String),

    #[error("invalid number id: {0}")]
    InvalidNumberId(String),

    #[error("unknown phone status: {0}")]
    UnknownPhoneStatus(String),

    #[error("phone {status} is missing required field {field}")]
    MissingPhoneField {
        status: &'static str,
        field: &'static str,
    },

    #[error("duplicate number id {0} in cell phones")]
    DuplicateNumberId(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
