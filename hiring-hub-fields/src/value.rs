//! Field value shapes.
//!
//! Every field holds exactly one of four value shapes. Raw input arrives as
//! `serde_json::Value` (persisted storage, form submissions, API payloads)
//! and is coerced or type-checked into a `FieldValue` before validation.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// The shape of a field's value — determines serialization and the
/// JSON-schema type name exported for storage registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Boolean,
    Integer,
    String,
    StringArray,
}

impl ValueType {
    /// JSON-schema type name for this value shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::String => "string",
            ValueType::StringArray => "array",
        }
    }
}

/// A validated, typed field value.
///
/// Serializes untagged, so a snapshot of field values is a plain JSON tree
/// that round-trips through storage unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    StringArray(Vec<String>),
}

impl FieldValue {
    /// The shape of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            FieldValue::Boolean(_) => ValueType::Boolean,
            FieldValue::Integer(_) => ValueType::Integer,
            FieldValue::String(_) => ValueType::String,
            FieldValue::StringArray(_) => ValueType::StringArray,
        }
    }

    /// The neutral value of a shape: `false`, `0`, `""`, `[]`.
    pub fn zero(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Boolean => FieldValue::Boolean(false),
            ValueType::Integer => FieldValue::Integer(0),
            ValueType::String => FieldValue::String(String::new()),
            ValueType::StringArray => FieldValue::StringArray(Vec::new()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            FieldValue::StringArray(values) => Some(values),
            _ => None,
        }
    }

    /// Render as a plain JSON value.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Boolean(value) => serde_json::Value::Bool(*value),
            FieldValue::Integer(value) => serde_json::Value::Number((*value).into()),
            FieldValue::String(value) => serde_json::Value::String(value.clone()),
            FieldValue::StringArray(values) => serde_json::Value::Array(
                values
                    .iter()
                    .map(|value| serde_json::Value::String(value.clone()))
                    .collect(),
            ),
        }
    }

    /// Best-effort coercion of a raw JSON value into the given shape.
    ///
    /// Booleans accept common truthy/falsy renderings, integers accept
    /// numeric strings and whole floats, strings accept any scalar. Arrays
    /// are type-checked, never coerced: input must already be an array of
    /// strings.
    pub fn coerce(raw: &serde_json::Value, value_type: ValueType) -> Result<Self, FieldError> {
        match value_type {
            ValueType::Boolean => match raw {
                serde_json::Value::Bool(value) => Ok(FieldValue::Boolean(*value)),
                serde_json::Value::String(value) => match value.as_str() {
                    "true" | "1" => Ok(FieldValue::Boolean(true)),
                    "false" | "0" | "" => Ok(FieldValue::Boolean(false)),
                    _ => Err(FieldError::type_mismatch("boolean", raw)),
                },
                serde_json::Value::Number(value) => match value.as_i64() {
                    Some(1) => Ok(FieldValue::Boolean(true)),
                    Some(0) => Ok(FieldValue::Boolean(false)),
                    _ => Err(FieldError::type_mismatch("boolean", raw)),
                },
                _ => Err(FieldError::type_mismatch("boolean", raw)),
            },
            ValueType::Integer => match raw {
                serde_json::Value::Number(value) => {
                    if let Some(int) = value.as_i64() {
                        Ok(FieldValue::Integer(int))
                    } else if let Some(float) = value.as_f64() {
                        if float.fract() == 0.0 {
                            Ok(FieldValue::Integer(float as i64))
                        } else {
                            Err(FieldError::type_mismatch("integer", raw))
                        }
                    } else {
                        Err(FieldError::type_mismatch("integer", raw))
                    }
                }
                serde_json::Value::String(value) => value
                    .trim()
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .map_err(|_| FieldError::type_mismatch("integer", raw)),
                _ => Err(FieldError::type_mismatch("integer", raw)),
            },
            ValueType::String => match raw {
                serde_json::Value::String(value) => Ok(FieldValue::String(value.clone())),
                serde_json::Value::Number(value) => Ok(FieldValue::String(value.to_string())),
                serde_json::Value::Bool(value) => Ok(FieldValue::String(value.to_string())),
                _ => Err(FieldError::type_mismatch("string", raw)),
            },
            ValueType::StringArray => match raw {
                serde_json::Value::Array(items) => {
                    let mut values = Vec::with_capacity(items.len());
                    for item in items {
                        match item.as_str() {
                            Some(value) => values.push(value.to_string()),
                            None => {
                                return Err(FieldError::TypeMismatch {
                                    expected: "array of strings",
                                    actual: "array with non-string items".to_string(),
                                })
                            }
                        }
                    }
                    Ok(FieldValue::StringArray(values))
                }
                _ => Err(FieldError::type_mismatch("array", raw)),
            },
        }
    }
}

/// The runtime type name of a raw JSON value, for error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::String(_) => "string",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
        serde_json::Value::Null => "null",
    }
}
