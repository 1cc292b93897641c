//! Ordered, keyed collections of fields and nested groups.

use indexmap::IndexMap;
use tracing::warn;

use crate::context::FieldContext;
use crate::error::FieldError;
use crate::field::Field;
use crate::value::FieldValue;

/// A member of a fields group: a leaf field or a nested group.
#[derive(Debug, Clone)]
pub enum FieldNode {
    Field(Field),
    Group(FieldsGroup),
}

/// A named, ordered collection of fields and nested groups.
///
/// Bulk operations isolate fields from each other: one field's invalid
/// input never blocks its siblings, and unknown keys never create ad-hoc
/// fields.
#[derive(Debug, Clone)]
pub struct FieldsGroup {
    key: String,
    nodes: IndexMap<String, FieldNode>,
}

impl FieldsGroup {
    pub(crate) fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nodes: IndexMap::new(),
        }
    }

    pub(crate) fn push_node(&mut self, key: String, node: FieldNode) {
        self.nodes.insert(key, node);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct child field by key; `None` for unknown keys and nested groups.
    pub fn field(&self, key: &str) -> Option<&Field> {
        match self.nodes.get(key) {
            Some(FieldNode::Field(field)) => Some(field),
            _ => None,
        }
    }

    /// Direct nested group by key.
    pub fn group(&self, key: &str) -> Option<&FieldsGroup> {
        match self.nodes.get(key) {
            Some(FieldNode::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Direct child field's value; `None` if the key is unknown.
    pub fn field_value(&self, key: &str) -> Option<&FieldValue> {
        self.field(key).map(Field::value)
    }

    /// Iterate the direct child fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.nodes.values().filter_map(|node| match node {
            FieldNode::Field(field) => Some(field),
            FieldNode::Group(_) => None,
        })
    }

    /// Snapshot of all child values, preserving nesting and declaration
    /// order. The output is valid `set_values` input.
    pub fn value(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, node) in &self.nodes {
            let value = match node {
                FieldNode::Field(field) => field.value().to_json(),
                FieldNode::Group(group) => group.value(),
            };
            map.insert(key.clone(), value);
        }
        serde_json::Value::Object(map)
    }

    /// Direct leaf values, for policy contexts.
    pub(crate) fn values_snapshot(&self) -> IndexMap<String, FieldValue> {
        self.fields()
            .map(|field| (field.key().to_string(), field.value().clone()))
            .collect()
    }

    /// Apply a raw mapping of key to value.
    ///
    /// Keys absent from the mapping leave their fields unchanged; keys the
    /// group does not declare are ignored. Each field validates with a
    /// context of the group's values as of the moment it is processed, so
    /// cross-field rules see siblings already updated earlier in the pass.
    pub fn set_values(&mut self, raw: &serde_json::Value, raw_from_storage: bool) {
        let Some(map) = raw.as_object() else {
            warn!(group = %self.key, "ignoring non-object raw values");
            return;
        };

        let mut context = FieldContext::from_values(self.values_snapshot());
        let keys: Vec<String> = self.nodes.keys().cloned().collect();

        for key in keys {
            let Some(raw_value) = map.get(&key) else {
                continue;
            };
            if let Some(node) = self.nodes.get_mut(&key) {
                match node {
                    FieldNode::Field(field) => {
                        field.set_value_with(raw_value, raw_from_storage, &context);
                        context.insert(key, field.value().clone());
                    }
                    FieldNode::Group(group) => {
                        group.set_values(raw_value, raw_from_storage);
                    }
                }
            }
        }
    }

    /// Whether any child field, at any depth, absorbed a validation failure
    /// during its last `set_value`.
    pub fn has_validation_errors(&self) -> bool {
        self.nodes.values().any(|node| match node {
            FieldNode::Field(field) => field.has_validation_error(),
            FieldNode::Group(group) => group.has_validation_errors(),
        })
    }

    /// All recorded validation failures, keyed by dotted field path.
    pub fn validation_errors(&self) -> Vec<(String, FieldError)> {
        let mut errors = Vec::new();
        self.collect_errors("", &mut errors);
        errors
    }

    fn collect_errors(&self, prefix: &str, errors: &mut Vec<(String, FieldError)>) {
        for (key, node) in &self.nodes {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                FieldNode::Field(field) => {
                    if let Some(error) = field.validation_error() {
                        errors.push((path, error.clone()));
                    }
                }
                FieldNode::Group(group) => group.collect_errors(&path, errors),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldConfig, GroupConfig};
    use serde_json::json;

    fn sample_group() -> FieldsGroup {
        GroupConfig::new()
            .field("archive_slug", FieldConfig::string("jobs"))
            .field("post_slug", FieldConfig::string("job"))
            .field("openings", FieldConfig::integer_bounded(1, 0, 10))
            .build("general")
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut group = sample_group();
        group.set_values(&json!({"archive_slug": "careers", "bogus": true}), true);

        assert_eq!(
            group.field_value("archive_slug"),
            Some(&FieldValue::String("careers".to_string())),
        );
        assert!(group.field("bogus").is_none());
        assert!(!group.has_validation_errors());
    }

    #[test]
    fn absent_keys_leave_fields_unchanged() {
        let mut group = sample_group();
        group.set_values(&json!({"post_slug": "vacancy"}), true);
        group.set_values(&json!({"openings": 3}), true);

        assert_eq!(
            group.field_value("post_slug"),
            Some(&FieldValue::String("vacancy".to_string())),
        );
        assert_eq!(group.field_value("openings"), Some(&FieldValue::Integer(3)));
    }

    #[test]
    fn non_object_raw_values_are_ignored() {
        let mut group = sample_group();
        group.set_values(&json!("nonsense"), true);
        assert_eq!(
            group.field_value("archive_slug"),
            Some(&FieldValue::String("jobs".to_string())),
        );
    }

    #[test]
    fn one_invalid_field_does_not_block_siblings() {
        let mut group = sample_group();
        group.set_values(&json!({"openings": 99, "post_slug": "vacancy"}), true);

        assert_eq!(group.field_value("openings"), Some(&FieldValue::Integer(1)));
        assert_eq!(
            group.field_value("post_slug"),
            Some(&FieldValue::String("vacancy".to_string())),
        );
        assert!(group.has_validation_errors());
        let errors = group.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "openings");
    }

    #[test]
    fn nested_groups_set_and_report_with_dotted_paths() {
        let mut group = GroupConfig::new()
            .group(
                "general",
                GroupConfig::new()
                    .field("archive_slug", FieldConfig::string("jobs"))
                    .field("openings", FieldConfig::integer_bounded(1, 0, 10)),
            )
            .build("settings");

        group.set_values(
            &json!({"general": {"archive_slug": "careers", "openings": 99}}),
            true,
        );

        let nested = group.group("general").unwrap();
        assert_eq!(
            nested.field_value("archive_slug"),
            Some(&FieldValue::String("careers".to_string())),
        );
        let errors = group.validation_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, "general.openings");
    }

    #[test]
    fn cross_field_context_sees_earlier_updates_in_same_pass() {
        let group_config = GroupConfig::new()
            .field("min", FieldConfig::integer(0, 0))
            .field(
                "max",
                FieldConfig::integer(10, 0).with_validator(|value, context| {
                    let minimum = context.int_value("min").unwrap_or(0);
                    let given = value.as_int().unwrap_or(0);
                    if given >= minimum {
                        Ok(())
                    } else {
                        Err(FieldError::invalid(format!(
                            "Max must be greater than or equal to {minimum}."
                        )))
                    }
                }),
            );

        let mut group = group_config.build("bounds");
        group.set_values(&json!({"min": 5, "max": 7}), true);
        assert!(!group.has_validation_errors());

        let mut group = group_config.build("bounds");
        group.set_values(&json!({"min": 5, "max": 3}), true);
        assert!(group.has_validation_errors());
        assert_eq!(group.field_value("max"), Some(&FieldValue::Integer(10)));
    }

    #[test]
    fn value_snapshot_preserves_declaration_order_and_nesting() {
        let mut group = sample_group();
        group.set_values(&json!({"openings": 2}), true);

        let snapshot = group.value();
        assert_eq!(
            snapshot,
            json!({"archive_slug": "jobs", "post_slug": "job", "openings": 2}),
        );
        let keys: Vec<&String> = snapshot.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["archive_slug", "post_slug", "openings"]);
    }

    #[test]
    fn snapshot_round_trips_through_a_fresh_group() {
        let config = GroupConfig::new()
            .field("archive_slug", FieldConfig::string("jobs"))
            .field("openings", FieldConfig::integer_bounded(1, 0, 10));

        let mut group = config.build("general");
        group.set_values(&json!({"archive_slug": "careers", "openings": 4}), true);
        let snapshot = group.value();

        let mut fresh = config.build("general");
        fresh.set_values(&snapshot, true);
        assert_eq!(fresh.value(), snapshot);
        assert!(!fresh.has_validation_errors());
    }
}
