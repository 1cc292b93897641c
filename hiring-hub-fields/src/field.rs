//! A single typed, named value holder with sanitize/validate/restore policies.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::context::FieldContext;
use crate::error::FieldError;
use crate::value::{FieldValue, ValueType};

/// Cleans a raw input value into a candidate of the field's value type.
pub type SanitizeFn =
    Arc<dyn Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync>;

/// Checks a candidate value; cross-field lookups go through the context.
pub type ValidateFn =
    Arc<dyn Fn(&FieldValue, &FieldContext) -> Result<(), FieldError> + Send + Sync>;

/// Produces a substitute valid value when validation fails.
pub type RestoreFn =
    Arc<dyn Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync>;

/// JSON-schema-like descriptor exported for storage/REST registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub value_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldSchema>>,
}

/// A single typed value unit.
///
/// After any `set_value` call the current value is a valid instance of the
/// field's value type: invalid input degrades to a restored or default
/// value and the failure stays queryable via `validation_error`.
#[derive(Clone)]
pub struct Field {
    key: String,
    value_type: ValueType,
    default_value: FieldValue,
    current_value: Option<FieldValue>,
    sanitizer: Option<SanitizeFn>,
    validator: Option<ValidateFn>,
    restorer: Option<RestoreFn>,
    minimum: Option<i64>,
    maximum: Option<i64>,
    bound_context: Option<FieldContext>,
    last_error: Option<FieldError>,
}

impl Field {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        key: String,
        value_type: ValueType,
        default_value: FieldValue,
        sanitizer: Option<SanitizeFn>,
        validator: Option<ValidateFn>,
        restorer: Option<RestoreFn>,
        minimum: Option<i64>,
        maximum: Option<i64>,
    ) -> Self {
        Self {
            key,
            value_type,
            default_value,
            current_value: None,
            sanitizer,
            validator,
            restorer,
            minimum,
            maximum,
            bound_context: None,
            last_error: None,
        }
    }

    /// Attach an owned configuration snapshot used as the policy context
    /// whenever no group context is supplied. Dynamic-field instances are
    /// bound to their own entry configuration this way.
    pub(crate) fn bind_context(&mut self, context: FieldContext) {
        self.bound_context = Some(context);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Current value, or the default if never set.
    pub fn value(&self) -> &FieldValue {
        self.current_value.as_ref().unwrap_or(&self.default_value)
    }

    pub fn default_value(&self) -> &FieldValue {
        &self.default_value
    }

    /// Lower bound for integer fields, used in validation and schema export.
    pub fn minimum(&self) -> Option<i64> {
        self.minimum
    }

    /// Upper bound for integer fields, used in validation and schema export.
    pub fn maximum(&self) -> Option<i64> {
        self.maximum
    }

    /// Whether the last `set_value` call fell back to a restored or
    /// default value.
    pub fn has_validation_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn validation_error(&self) -> Option<&FieldError> {
        self.last_error.as_ref()
    }

    /// Apply a raw value.
    ///
    /// `raw_from_storage` marks low-trust input (persisted meta, request
    /// payloads) that runs through the sanitizer before validation;
    /// programmatic values skip sanitization and are validated directly.
    /// Never fails: on validation failure the restorer (or the default)
    /// supplies the stored value and the error is recorded.
    pub fn set_value(&mut self, raw: &serde_json::Value, raw_from_storage: bool) {
        let outcome = self.apply(raw, raw_from_storage, None);
        self.store(outcome);
    }

    pub(crate) fn set_value_with(
        &mut self,
        raw: &serde_json::Value,
        raw_from_storage: bool,
        context: &FieldContext,
    ) {
        let outcome = self.apply(raw, raw_from_storage, Some(context));
        self.store(outcome);
    }

    fn apply(
        &self,
        raw: &serde_json::Value,
        raw_from_storage: bool,
        context: Option<&FieldContext>,
    ) -> (FieldValue, Option<FieldError>) {
        let empty = FieldContext::empty();
        let context = context
            .or(self.bound_context.as_ref())
            .unwrap_or(&empty);

        let candidate = if raw_from_storage {
            match &self.sanitizer {
                Some(sanitize) => Ok(sanitize(raw, context)),
                None => FieldValue::coerce(raw, self.value_type),
            }
        } else {
            FieldValue::coerce(raw, self.value_type)
        };

        let validated = candidate.and_then(|value| {
            if value.value_type() != self.value_type {
                return Err(FieldError::TypeMismatch {
                    expected: self.value_type.as_str(),
                    actual: value.value_type().as_str().to_string(),
                });
            }
            self.validate(&value, context)?;
            Ok(value)
        });

        match validated {
            Ok(value) => (value, None),
            Err(error) => {
                let restored = match &self.restorer {
                    Some(restore) => {
                        let value = restore(raw, context);
                        if value.value_type() == self.value_type {
                            value
                        } else {
                            self.default_value.clone()
                        }
                    }
                    None => self.default_value.clone(),
                };
                (restored, Some(error))
            }
        }
    }

    fn validate(&self, value: &FieldValue, context: &FieldContext) -> Result<(), FieldError> {
        if let FieldValue::Integer(int) = value {
            if let Some(minimum) = self.minimum {
                let out_of_range = *int < minimum
                    || self.maximum.is_some_and(|maximum| *int > maximum);
                if out_of_range {
                    return Err(FieldError::OutOfRange {
                        value: *int,
                        minimum,
                        maximum: self.maximum,
                    });
                }
            }
        }
        if let Some(validate) = &self.validator {
            validate(value, context)?;
        }
        Ok(())
    }

    fn store(&mut self, (value, error): (FieldValue, Option<FieldError>)) {
        if let Some(error) = &error {
            debug!(field = %self.key, %error, "field value restored after failed validation");
        }
        self.current_value = Some(value);
        self.last_error = error;
    }

    /// JSON-schema-like descriptor for this field.
    pub fn schema(&self) -> FieldSchema {
        FieldSchema {
            value_type: self.value_type.as_str(),
            minimum: self.minimum,
            maximum: self.maximum,
            items: match self.value_type {
                ValueType::StringArray => Some(Box::new(FieldSchema {
                    value_type: "string",
                    minimum: None,
                    maximum: None,
                    items: None,
                })),
                _ => None,
            },
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("value_type", &self.value_type)
            .field("value", &self.value())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
