//! Reusable field policies.
//!
//! Factories for the sanitizers, validators and restorers shared between
//! statically declared fields and dynamic-field templates: calendar dates,
//! URLs and email addresses, alphanumeric string lists and slugs. Each
//! factory returns a pure closure; cross-field parameters (a date field's
//! `allow_empty` flag) are read from the policy context.

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::context::FieldContext;
use crate::error::FieldError;
use crate::value::{FieldValue, ValueType};

/// Email address pattern
const EMAIL: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// HTTP/HTTPS URL pattern
const URL: &str = r"^https?://[^\s]+$";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a string is a calendar-valid `YYYY-MM-DD` date.
pub fn is_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

/// Validator for date fields.
///
/// Empty values pass when the context's `allow_empty` flag is set (or
/// absent); anything else must be a calendar-valid date.
pub fn date_validator(
) -> impl Fn(&FieldValue, &FieldContext) -> Result<(), FieldError> + Send + Sync + 'static {
    |value, context| {
        let Some(value) = value.as_str() else {
            return Err(FieldError::TypeMismatch {
                expected: "string",
                actual: value.value_type().as_str().to_string(),
            });
        };
        let allow_empty = context.bool_value("allow_empty").unwrap_or(true);
        if allow_empty && value.is_empty() {
            return Ok(());
        }
        if is_date(value) {
            Ok(())
        } else {
            Err(FieldError::InvalidDate {
                value: value.to_string(),
            })
        }
    }
}

/// Restorer for date fields.
///
/// Prefers the context's `default_value` when it is a valid date, then an
/// empty string when `allow_empty` permits it, then today's date.
pub fn date_restorer(
) -> impl Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static {
    |_raw, context| {
        let default_value = context.str_value("default_value").unwrap_or_default();
        if is_date(default_value) {
            return FieldValue::String(default_value.to_string());
        }
        if context.bool_value("allow_empty").unwrap_or(true) {
            return FieldValue::String(String::new());
        }
        FieldValue::String(Local::now().date_naive().format(DATE_FORMAT).to_string())
    }
}

/// Sanitizer for URL fields: trims whitespace, lower-cases email-shaped
/// input, renders non-strings as empty.
pub fn url_sanitizer(
) -> impl Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static {
    let email = Regex::new(EMAIL).expect("pattern is valid");
    move |raw, _context| {
        let value = raw.as_str().unwrap_or_default().trim().to_string();
        if value.is_empty() {
            return FieldValue::String(value);
        }
        if email.is_match(&value) {
            FieldValue::String(value.to_lowercase())
        } else {
            FieldValue::String(value)
        }
    }
}

/// Validator for URL fields: empty values and email addresses pass,
/// everything else must be an HTTP(S) URL.
pub fn url_validator(
) -> impl Fn(&FieldValue, &FieldContext) -> Result<(), FieldError> + Send + Sync + 'static {
    let email = Regex::new(EMAIL).expect("pattern is valid");
    let url = Regex::new(URL).expect("pattern is valid");
    move |value, _context| {
        let Some(value) = value.as_str() else {
            return Err(FieldError::TypeMismatch {
                expected: "string",
                actual: value.value_type().as_str().to_string(),
            });
        };
        if value.is_empty() || email.is_match(value) || url.is_match(value) {
            Ok(())
        } else {
            Err(FieldError::InvalidUrl {
                value: value.to_string(),
            })
        }
    }
}

/// Sanitizer for string-list fields that keeps word characters only.
/// Non-array input sanitizes to an empty list; non-string items are
/// dropped.
pub fn alphanumeric_strings_sanitizer(
) -> impl Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static {
    let non_word = Regex::new(r"\W").expect("pattern is valid");
    move |raw, _context| {
        let values = match raw.as_array() {
            Some(items) => items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(|value| non_word.replace_all(value, "").into_owned())
                .collect(),
            None => Vec::new(),
        };
        FieldValue::StringArray(values)
    }
}

/// Sanitizer for slug fields: lowercase, whitespace to `-`, everything
/// outside `[a-z0-9_-]` stripped.
pub fn slug_sanitizer(
) -> impl Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static {
    let whitespace = Regex::new(r"\s+").expect("pattern is valid");
    let forbidden = Regex::new(r"[^a-z0-9_-]").expect("pattern is valid");
    move |raw, _context| {
        let value = raw.as_str().unwrap_or_default().trim().to_lowercase();
        let value = whitespace.replace_all(&value, "-");
        FieldValue::String(forbidden.replace_all(&value, "").into_owned())
    }
}

/// Validator for slug fields: a non-empty string.
pub fn slug_validator(
) -> impl Fn(&FieldValue, &FieldContext) -> Result<(), FieldError> + Send + Sync + 'static {
    |value, _context| match value.as_str() {
        Some(slug) if !slug.is_empty() => Ok(()),
        Some(slug) => Err(FieldError::invalid(format!(
            "\"{slug}\" is not a valid slug."
        ))),
        None => Err(FieldError::TypeMismatch {
            expected: "string",
            actual: value.value_type().as_str().to_string(),
        }),
    }
}
