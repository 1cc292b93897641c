//! Read-only sibling-value context for field policies.
//!
//! Validators, sanitizers and restorers that need cross-field lookups (a
//! date field's `allow_empty` flag, an integer `max` that must respect a
//! sibling `min`) receive an explicit `FieldContext` instead of capturing
//! their owning group. This keeps policies pure and testable in isolation.

use indexmap::IndexMap;

use crate::value::FieldValue;

/// A snapshot of field values visible to a policy while it runs.
///
/// During a bulk `set_values` pass the context reflects the owning group's
/// values as of the moment each field is processed. Dynamic-field instances
/// carry a bound context holding their own configuration values instead.
#[derive(Debug, Clone, Default)]
pub struct FieldContext {
    values: IndexMap<String, FieldValue>,
}

impl FieldContext {
    /// Context with no sibling values, for independent fields.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context over an owned snapshot of values.
    pub fn from_values(values: IndexMap<String, FieldValue>) -> Self {
        Self { values }
    }

    /// Add a single value; useful when assembling a context by hand.
    pub fn with_value(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub(crate) fn insert(&mut self, key: String, value: FieldValue) {
        self.values.insert(key, value);
    }

    /// Look up a sibling value by key.
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.value(key).and_then(FieldValue::as_bool)
    }

    pub fn int_value(&self, key: &str) -> Option<i64> {
        self.value(key).and_then(FieldValue::as_int)
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(FieldValue::as_str)
    }

    pub fn strings_value(&self, key: &str) -> Option<&[String]> {
        self.value(key).and_then(FieldValue::as_strings)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
