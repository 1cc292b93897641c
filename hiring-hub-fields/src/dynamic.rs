//! Dynamically configured fields groups.
//!
//! A dynamic fields group's member set is itself data: a stored mapping of
//! entry key to per-entry configuration, where each entry names a template
//! from a fixed registry. The template describes how one dynamic field is
//! configured (its name, help text, type-specific parameters) and carries
//! the policies applied to instances of that template.
//!
//! Two layers: the entry-configuration layer is validated with ordinary
//! fields groups built from the template's configuration; the instance
//! layer resolves validated entries into concrete fields whose policies are
//! bound to that entry's own configuration values.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::GroupConfig;
use crate::context::FieldContext;
use crate::error::FieldError;
use crate::field::{Field, RestoreFn, SanitizeFn, ValidateFn};
use crate::group::{FieldNode, FieldsGroup};
use crate::value::{FieldValue, ValueType};

/// Blueprint for one kind of dynamically created field.
#[derive(Clone)]
pub struct FieldTemplate {
    value_type: ValueType,
    config: GroupConfig,
    sanitizer: Option<SanitizeFn>,
    validator: Option<ValidateFn>,
    restorer: Option<RestoreFn>,
}

impl FieldTemplate {
    /// Template producing instances of the given value type, configured
    /// through the given entry-configuration fields.
    ///
    /// Well-known configuration keys shape the instance: `default_value`
    /// supplies its default, and for integer instances `min`, `max` and
    /// `use_max` supply the bounds.
    pub fn new(value_type: ValueType, config: GroupConfig) -> Self {
        Self {
            value_type,
            config,
            sanitizer: None,
            validator: None,
            restorer: None,
        }
    }

    /// Sanitizer applied to instances of this template.
    pub fn with_sanitizer<F>(mut self, sanitize: F) -> Self
    where
        F: Fn(&serde_json::Value, &FieldContext) -> FieldValue + Send + Sync + 'static,
    {
        self.sanitizer = Some(Arc::new(sanitize));
        self
    }

    /// Validator applied to instances of this template.
    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&FieldValue, &FieldContext) -> Result<(), FieldError> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validate));
        self
    }

    /// Restorer applied to instances of this template.
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

    /// The entry-configuration fields of this template.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Resolve a validated entry configuration into a concrete field.
    fn instantiate(&self, key: &str, configuration: IndexMap<String, FieldValue>) -> Field {
        let default_value = configuration
            .get("default_value")
            .filter(|value| value.value_type() == self.value_type)
            .cloned()
            .unwrap_or_else(|| FieldValue::zero(self.value_type));

        let (minimum, maximum) = if self.value_type == ValueType::Integer {
            let minimum = configuration.get("min").and_then(FieldValue::as_int);
            let use_max = configuration
                .get("use_max")
                .and_then(FieldValue::as_bool)
                .unwrap_or(false);
            let maximum = if use_max {
                configuration.get("max").and_then(FieldValue::as_int)
            } else {
                None
            };
            (minimum, maximum)
        } else {
            (None, None)
        };

        let mut field = Field::new(
            key.to_string(),
            self.value_type,
            default_value,
            self.sanitizer.clone(),
            self.validator.clone(),
            self.restorer.clone(),
            minimum,
            maximum,
        );
        field.bind_context(FieldContext::from_values(configuration));
        field
    }
}

impl fmt::Debug for FieldTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTemplate")
            .field("value_type", &self.value_type)
            .finish_non_exhaustive()
    }
}

/// Ordered mapping of type discriminator to template; read-only after
/// setup.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: IndexMap<String, FieldTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under its type discriminator.
    pub fn register(mut self, type_name: impl Into<String>, template: FieldTemplate) -> Self {
        self.templates.insert(type_name.into(), template);
        self
    }

    pub fn template(&self, type_name: &str) -> Option<&FieldTemplate> {
        self.templates.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// A fields group whose member field set is derived from stored
/// configuration entries resolved against a template registry.
#[derive(Debug, Clone)]
pub struct DynamicFieldsGroup {
    key: String,
    registry: TemplateRegistry,
    entries: IndexMap<String, FieldsGroup>,
}

impl DynamicFieldsGroup {
    pub fn new(key: impl Into<String>, registry: TemplateRegistry) -> Self {
        Self {
            key: key.into(),
            registry,
            entries: IndexMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A single entry's validated configuration group.
    pub fn entry(&self, key: &str) -> Option<&FieldsGroup> {
        self.entries.get(key)
    }

    /// Apply a raw mapping of entry key to entry configuration.
    ///
    /// The group's shape is data, so the entry set is rebuilt from the raw
    /// mapping on every call. Entries whose `type` names no registered
    /// template are skipped entirely, which keeps configurations written by
    /// newer or older versions loadable.
    pub fn set_values(&mut self, raw: &serde_json::Value, raw_from_storage: bool) {
        let Some(map) = raw.as_object() else {
            warn!(group = %self.key, "ignoring non-object dynamic configuration");
            return;
        };

        self.entries.clear();
        for (entry_key, entry_raw) in map {
            let type_name = entry_raw.get("type").and_then(serde_json::Value::as_str);
            let Some(type_name) = type_name else {
                debug!(group = %self.key, entry = %entry_key, "skipping entry without a type");
                continue;
            };
            let Some(template) = self.registry.template(type_name) else {
                debug!(
                    group = %self.key,
                    entry = %entry_key,
                    template = %type_name,
                    "skipping entry with unregistered template type",
                );
                continue;
            };

            let mut entry = template.config().build(entry_key.clone());
            entry.set_values(entry_raw, raw_from_storage);
            self.entries.insert(entry_key.clone(), entry);
        }
    }

    /// The validated per-entry configuration map: the template
    /// configuration layer, not instance values.
    pub fn value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, entry) in &self.entries {
            map.insert(key.clone(), entry.value());
        }
        serde_json::Value::Object(map)
    }

    pub fn has_validation_errors(&self) -> bool {
        self.entries.values().any(FieldsGroup::has_validation_errors)
    }

    /// All entry-configuration validation failures, keyed by
    /// `entry_key.field_key`.
    pub fn validation_errors(&self) -> Vec<(String, FieldError)> {
        let mut errors = Vec::new();
        for (entry_key, entry) in &self.entries {
            for (field_path, error) in entry.validation_errors() {
                errors.push((format!("{entry_key}.{field_path}"), error));
            }
        }
        errors
    }

    /// Resolve the configured entries into a concrete fields group of
    /// instantiated fields, keyed by entry key.
    ///
    /// Fails soft: while this group's own configuration has validation
    /// errors no dynamic fields are instantiated at all; a broken
    /// configuration never yields partially built fields.
    pub fn dynamic_fields(&self, namespace_key: impl Into<String>) -> Option<FieldsGroup> {
        if self.has_validation_errors() {
            debug!(
                group = %self.key,
                "dynamic fields not instantiated: configuration has validation errors",
            );
            return None;
        }

        let mut group = FieldsGroup::empty(namespace_key);
        for (entry_key, entry) in &self.entries {
            let Some(type_name) = entry.field_value("type").and_then(FieldValue::as_str) else {
                continue;
            };
            let Some(template) = self.registry.template(type_name) else {
                continue;
            };
            let field = template.instantiate(entry_key, entry.values_snapshot());
            group.push_node(entry_key.clone(), FieldNode::Field(field));
        }
        Some(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::policies;
    use serde_json::json;

    fn date_template() -> FieldTemplate {
        FieldTemplate::new(
            ValueType::String,
            GroupConfig::new()
                .field("allow_empty", FieldConfig::boolean(true))
                .field(
                    "default_value",
                    FieldConfig::string("")
                        .with_validator(policies::date_validator())
                        .with_restorer(policies::date_restorer()),
                )
                .field("help", FieldConfig::string(""))
                .field("key", FieldConfig::dynamic_key())
                .field("name", FieldConfig::string("New field"))
                .field("type", FieldConfig::exact_string("date")),
        )
        .with_validator(policies::date_validator())
        .with_restorer(policies::date_restorer())
    }

    fn registry() -> TemplateRegistry {
        TemplateRegistry::new()
            .register("date", date_template())
            .register(
                "boolean",
                FieldTemplate::new(
                    ValueType::Boolean,
                    GroupConfig::new()
                        .field("default_value", FieldConfig::boolean(false))
                        .field("help", FieldConfig::string(""))
                        .field("key", FieldConfig::dynamic_key())
                        .field("name", FieldConfig::string("New field"))
                        .field("type", FieldConfig::exact_string("boolean")),
                ),
            )
            .register(
                "integer",
                FieldTemplate::new(
                    ValueType::Integer,
                    GroupConfig::new()
                        .field("default_value", FieldConfig::integer(1, 0))
                        .field("help", FieldConfig::string(""))
                        .field("key", FieldConfig::dynamic_key())
                        .field("max", FieldConfig::integer(10_000, 0))
                        .field("min", FieldConfig::integer(0, 0))
                        .field("name", FieldConfig::string("New field"))
                        .field("type", FieldConfig::exact_string("integer"))
                        .field("use_max", FieldConfig::boolean(false)),
                ),
            )
    }

    #[test]
    fn entries_with_unregistered_types_are_skipped() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({
                "known": {"key": "known", "name": "Known", "type": "boolean", "default_value": true},
                "future": {"key": "future", "name": "Future", "type": "hologram"},
            }),
            true,
        );

        assert_eq!(group.len(), 1);
        assert!(group.entry("known").is_some());
        assert!(group.entry("future").is_none());

        let fields = group.dynamic_fields("job_fields").unwrap();
        assert_eq!(fields.fields().count(), 1);
        assert!(fields.field("future").is_none());
    }

    #[test]
    fn broken_configuration_yields_no_dynamic_fields() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({
                "start": {
                    "key": "start",
                    "name": "Start date",
                    "type": "date",
                    "allow_empty": false,
                    "default_value": "not-a-date",
                },
            }),
            true,
        );

        assert!(group.has_validation_errors());
        assert!(group.dynamic_fields("job_fields").is_none());
    }

    #[test]
    fn date_instance_restores_to_today_when_empty_disallowed() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        // No default_value in the entry: the configuration keeps the empty
        // default untouched and validates cleanly.
        group.set_values(
            &json!({
                "start": {"key": "start", "name": "Start date", "type": "date", "allow_empty": false},
            }),
            true,
        );
        assert!(!group.has_validation_errors());

        let mut fields = group.dynamic_fields("job_fields").unwrap();
        fields.set_values(&json!({"start": ""}), true);

        let field = fields.field("start").unwrap();
        assert!(field.has_validation_error());
        let restored = field.value().as_str().unwrap();
        assert!(chrono::NaiveDate::parse_from_str(restored, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn invalid_entry_default_is_date_restored_at_configuration_time() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({
                "start": {
                    "key": "start",
                    "name": "Start date",
                    "type": "date",
                    "allow_empty": false,
                    "default_value": "not-a-date",
                },
            }),
            true,
        );

        assert!(group.has_validation_errors());
        let entry = group.entry("start").unwrap();
        let restored = entry.field_value("default_value").unwrap().as_str().unwrap();
        assert!(chrono::NaiveDate::parse_from_str(restored, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn instances_of_one_template_are_independently_configured() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({
                "optional": {
                    "key": "optional",
                    "name": "Optional date",
                    "type": "date",
                    "allow_empty": true,
                    "default_value": "",
                },
                "mandatory": {
                    "key": "mandatory",
                    "name": "Mandatory date",
                    "type": "date",
                    "allow_empty": false,
                    "default_value": "2026-01-15",
                },
            }),
            true,
        );
        assert!(!group.has_validation_errors());

        let mut fields = group.dynamic_fields("job_fields").unwrap();
        assert_eq!(fields.fields().count(), 2);

        // Empty value passes where the entry allows it and restores where
        // it does not.
        fields.set_values(&json!({"optional": "", "mandatory": ""}), true);
        let optional = fields.field("optional").unwrap();
        assert!(!optional.has_validation_error());
        assert_eq!(optional.value(), &FieldValue::String(String::new()));

        let mandatory = fields.field("mandatory").unwrap();
        assert!(mandatory.has_validation_error());
        assert_eq!(
            mandatory.value(),
            &FieldValue::String("2026-01-15".to_string()),
        );
    }

    #[test]
    fn integer_instance_takes_bounds_from_entry_configuration() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({
                "openings": {
                    "key": "openings",
                    "name": "Total job openings",
                    "type": "integer",
                    "default_value": 1,
                    "min": 1,
                    "max": 100,
                    "use_max": true,
                },
            }),
            true,
        );

        let mut fields = group.dynamic_fields("job_fields").unwrap();
        let field = fields.field("openings").unwrap();
        assert_eq!(field.minimum(), Some(1));
        assert_eq!(field.maximum(), Some(100));

        fields.set_values(&json!({"openings": 500}), true);
        let field = fields.field("openings").unwrap();
        assert!(field.has_validation_error());
        assert_eq!(field.value(), &FieldValue::Integer(1));
    }

    #[test]
    fn reconfiguring_rebuilds_the_entry_set() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({"a": {"key": "a", "name": "A", "type": "boolean", "default_value": false}}),
            true,
        );
        assert!(group.entry("a").is_some());

        group.set_values(
            &json!({"b": {"key": "b", "name": "B", "type": "boolean", "default_value": true}}),
            true,
        );
        assert!(group.entry("a").is_none());
        assert!(group.entry("b").is_some());
    }

    #[test]
    fn value_returns_entry_configuration_not_instance_values() {
        let mut group = DynamicFieldsGroup::new("job_specification", registry());
        group.set_values(
            &json!({"pto": {"key": "pto", "name": "Paid time off", "type": "boolean", "default_value": true, "help": ""}}),
            true,
        );

        let value = group.value();
        let entry = value.get("pto").unwrap();
        assert_eq!(entry.get("type"), Some(&json!("boolean")));
        assert_eq!(entry.get("default_value"), Some(&json!(true)));
    }
}
