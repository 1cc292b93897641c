//! Declarative field and group configuration.
//!
//! A `FieldConfig` is the recipe a field is built from; a `GroupConfig` is
//! an ordered map of recipes (fields or nested groups). Construction from
//! the same configuration is deterministic, so a group can be rebuilt
//! identically for every validation pass.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::context::FieldContext;
use crate::error::FieldError;
use crate::field::{Field, RestoreFn, SanitizeFn, ValidateFn};
use crate::group::{FieldNode, FieldsGroup};
use crate::value::{FieldValue, ValueType};

/// Recipe for a single field: value type, default, policies, bounds.
#[derive(Clone)]
pub struct FieldConfig {
    value_type: ValueType,
    default_value: FieldValue,
    sanitizer: Option<SanitizeFn>,
    validator: Option<ValidateFn>,
    restorer: Option<RestoreFn>,
    minimum: Option<i64>,
    maximum: Option<i64>,
}

impl FieldConfig {
    fn new(value_type: ValueType, default_value: FieldValue) -> Self {
        Self {
            value_type,
            default_value,
            sanitizer: None,
            validator: None,
            restorer: None,
            minimum: None,
            maximum: None,
        }
    }

    /// Boolean field; raw input coerces through common truthy/falsy
    /// renderings ("1", "true", 1, true).
    pub fn boolean(default: bool) -> Self {
        Self::new(ValueType::Boolean, FieldValue::Boolean(default))
    }

    /// Integer field with a lower bound; values below it fall back to the
    /// default.
    pub fn integer(default: i64, minimum: i64) -> Self {
        let mut config = Self::new(ValueType::Integer, FieldValue::Integer(default));
        config.minimum = Some(minimum);
        config
    }

    /// Integer field with both bounds enforced.
    pub fn integer_bounded(default: i64, minimum: i64, maximum: i64) -> Self {
        let mut config = Self::integer(default, minimum);
        config.maximum = Some(maximum);
        config
    }

    /// Free-form string field. Combine with `with_sanitizer`,
    /// `with_validator` and `with_restorer` to build URL, date or slug
    /// fields.
    pub fn string(default: impl Into<String>) -> Self {
        Self::new(ValueType::String, FieldValue::String(default.into()))
    }

    /// String constrained to an enumerated set of choices.
    pub fn string_of_choice(default: impl Into<String>, choices: Vec<String>) -> Self {
        Self::string(default).with_validator(move |value, _context| {
            let given = value.as_str().unwrap_or_default();
            if choices.iter().any(|choice| choice == given) {
                Ok(())
            } else {
                Err(FieldError::NotInChoices {
                    value: given.to_string(),
                    choices: choices.clone(),
                })
            }
        })
    }

    /// Ordered list of strings; input is type-checked, never coerced.
    pub fn array_of_strings(default: Vec<String>) -> Self {
        Self::new(ValueType::StringArray, FieldValue::StringArray(default))
    }

    /// String pinned to one exact value, used for type discriminators.
    pub fn exact_string(value: impl Into<String>) -> Self {
        let expected = value.into();
        Self::string(expected.clone()).with_validator(move |value, _context| {
            let given = value.as_str().unwrap_or_default();
            if given == expected {
                Ok(())
            } else {
                Err(FieldError::invalid(format!(
                    "\"{given}\" does not match the expected value \"{expected}\"."
                )))
            }
        })
    }

    /// Key field of a dynamic entry: sanitized to `[A-Za-z0-9_:-]`, must
    /// not end up empty.
    pub fn dynamic_key() -> Self {
        let forbidden = Regex::new(r"[^A-Za-z0-9_:-]").expect("pattern is valid");
        Self::string("")
            .with_sanitizer(move |raw, _context| {
                let value = raw.as_str().unwrap_or_default();
                FieldValue::String(forbidden.replace_all(value, "").into_owned())
            })
            .with_validator(|value, _context| {
                let given = value.as_str().unwrap_or_default();
                if given.is_empty() {
                    Err(FieldError::invalid("Field key must not be empty."))
                } else {
                    Ok(())
                }
            })
    }

    /// Replace the sanitizer applied to low-trust raw input.
    pub fn with_sanitizer<F>(mut self, sanitize: F) -> Self
    where
        F: Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static,
    {
        self.sanitizer = Some(Arc::new(sanitize));
        self
    }

    /// Replace the validator applied after sanitization.
    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&FieldValue, &FieldContext) -> Result<(), FieldError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validate));
        self
    }

    /// Replace the restorer invoked when validation fails.
    pub fn with_restorer<F>(mut self, restore: F) -> Self
    where
        F: Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static,
    {
        self.restorer = Some(Arc::new(restore));
        self
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Build a field from this recipe.
    pub fn build(&self, key: impl Into<String>) -> Field {
        Field::new(
            key.into(),
            self.value_type,
            self.default_value.clone(),
            self.sanitizer.clone(),
            self.validator.clone(),
            self.restorer.clone(),
            self.minimum,
            self.maximum,
        )
    }
}

/// A node of a group configuration: a field recipe or a nested group.
#[derive(Clone)]
pub enum NodeConfig {
    Field(FieldConfig),
    Group(GroupConfig),
}

/// Ordered, keyed map of field and nested-group recipes.
#[derive(Clone, Default)]
pub struct GroupConfig {
    nodes: IndexMap<String, NodeConfig>,
}

impl GroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field; declaration order is preserved.
    pub fn field(mut self, key: impl Into<String>, config: FieldConfig) -> Self {
        self.nodes.insert(key.into(), NodeConfig::Field(config));
        self
    }

    /// Declare a nested group.
    pub fn group(mut self, key: impl Into<String>, config: GroupConfig) -> Self {
        self.nodes.insert(key.into(), NodeConfig::Group(config));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Build a fields group from this configuration.
    pub fn build(&self, key: impl Into<String>) -> FieldsGroup {
        let mut group = FieldsGroup::empty(key);
        for (node_key, node) in &self.nodes {
            let node = match node {
                NodeConfig::Field(config) => FieldNode::Field(config.build(node_key.clone())),
                NodeConfig::Group(config) => FieldNode::Group(config.build(node_key.clone())),
            };
            group.push_node(node_key.clone(), node);
        }
        group
    }
}
