use thiserror::Error;

/// Errors produced by type operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid record id: {0:?}")]
    InvalidId(String),
}

/// A write payload that violates the field constraints of its record kind.
///
/// The display string is what clients see in the `error` field of the
/// response envelope, so every variant names the offending field.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .fields.join(", "))]
    MissingRequiredFields { fields: Vec<&'static str> },

    #[error("{field} is required and must be a non-empty string")]
    Empty { field: &'static str },

    #[error("{field} must not exceed {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },

    #[error("status must be one of unread, reading, completed (got {value:?})")]
    InvalidStatus { value: String },

    #[error("{field} cannot be null")]
    NullNotAllowed { field: &'static str },

    #[error("request body must be a JSON object")]
    NotAnObject,
}

impl ValidationError {
    /// The field this error is about, if it concerns a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Empty { field }
            | Self::TooLong { field, .. }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::NullNotAllowed { field } => Some(*field),
            Self::InvalidStatus { .. } => Some("status"),
            Self::MissingRequiredFields { .. } | Self::NotAnObject => None,
        }
    }
}
