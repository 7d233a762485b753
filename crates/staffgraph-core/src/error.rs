use thiserror::Error;

/// Rejected caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' must be a non-empty string")]
    EmptyField { field: &'static str },

    #[error("Invalid identifier: {raw}")]
    InvalidId { raw: String },
}
