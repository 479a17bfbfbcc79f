//! Engine error types

use thiserror::Error;

/// Engine result type alias
pub type Result<T> = std::result::Result<T, FlipError>;

/// Errors raised by the flip engine.
///
/// Empty inputs are never errors; every stage returns an empty collection instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlipError {
    /// A required field is absent, blank, or outside its allowed domain
    #[error("invalid record {record}: field `{field}` {message}")]
    Validation {
        record: String,
        field: &'static str,
        message: String,
    },

    /// A date or numeric field could not be interpreted
    #[error("cannot parse field `{field}` from {value:?}: {message}")]
    Parse {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl FlipError {
    pub(crate) fn missing(record: &str, field: &'static str) -> Self {
        FlipError::Validation {
            record: record.to_string(),
            field,
            message: "is missing".to_string(),
        }
    }

    pub(crate) fn parse(field: &'static str, value: &str, message: impl Into<String>) -> Self {
        FlipError::Parse {
            field,
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending field, when the error concerns a single record
    pub fn field(&self) -> Option<&'static str> {
        match self {
            FlipError::Validation { field, .. } | FlipError::Parse { field, .. } => Some(field),
            FlipError::Config(_) => None,
        }
    }
}
