//! Error types for the validatable fields engine

use thiserror::Error;

use crate::value::json_type_name;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// A validation failure recorded against a single field.
///
/// These errors never propagate out of `set_value`: invalid input degrades
/// to a restored or default value, and the error stays queryable on the
/// field and its owning group.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// Value has the wrong runtime type
    #[error("value must be {expected}, {actual} given")]
    TypeMismatch {
        expected: &'static str,
        actual: String,
    },

    /// Integer outside its configured bounds
    #[error("value {value} is out of range [{minimum}, {maximum:?}]")]
    OutOfRange {
        value: i64,
        minimum: i64,
        maximum: Option<i64>,
    },

    /// Value not a member of the allowed set
    #[error("\"{value}\" is not within the allowed set: {choices:?}")]
    NotInChoices { value: String, choices: Vec<String> },

    /// Too many selections for a bounded multi-value field
    #[error("up to {allowed} values allowed, {given} given")]
    TooManySelections { allowed: usize, given: usize },

    /// String is not a calendar-valid date
    #[error("\"{value}\" is not a valid date")]
    InvalidDate { value: String },

    /// String is neither a URL nor an email address
    #[error("\"{value}\" is not a valid URL")]
    InvalidUrl { value: String },

    /// String could not be parsed as JSON
    #[error("value must be a valid JSON")]
    NotJson,

    /// Custom validator failure with a ready-made message
    #[error("{message}")]
    Invalid { message: String },
}

impl FieldError {
    /// Custom validation failure with a ready-made message.
    pub fn invalid(message: impl Into<String>) -> Self {
        FieldError::Invalid {
            message: message.into(),
        }
    }

    /// Type mismatch naming the runtime type of the offending raw value.
    pub fn type_mismatch(expected: &'static str, raw: &serde_json::Value) -> Self {
        FieldError::TypeMismatch {
            expected,
            actual: json_type_name(raw).to_string(),
        }
    }
}
