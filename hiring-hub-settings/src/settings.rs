//! The plugin settings aggregate.

use hiring_hub_fields::{DynamicFieldsGroup, FieldError, FieldsGroup};
use serde_json::json;
use tracing::debug;

use crate::defaults::default_settings;
use crate::general::general_group;
use crate::job_specification::{templates, SETTINGS_KEY};

/// All Hiring Hub settings: the static "general" group plus the dynamic
/// "job_specification" group.
///
/// A `Settings` value is built fresh for every validation pass; callers
/// that cache must do so outside this type.
#[derive(Debug, Clone)]
pub struct Settings {
    general: FieldsGroup,
    job_specification: DynamicFieldsGroup,
}

impl Settings {
    /// Settings pre-populated with the default configuration.
    pub fn new() -> Self {
        let mut settings = Self {
            general: general_group().build("general"),
            job_specification: DynamicFieldsGroup::new(SETTINGS_KEY, templates()),
        };
        settings.set_values(&default_settings(), false);
        debug_assert!(!settings.has_validation_errors());
        settings
    }

    /// Settings loaded from a persisted configuration tree.
    pub fn from_raw(raw: &serde_json::Value) -> Self {
        let mut settings = Self::new();
        settings.set_values(raw, true);
        settings
    }

    /// Apply a raw settings tree: `{general: {...}, job_specification: {...}}`.
    pub fn set_values(&mut self, raw: &serde_json::Value, raw_from_storage: bool) {
        if let Some(general) = raw.get("general") {
            self.general.set_values(general, raw_from_storage);
        }
        if let Some(job_specification) = raw.get(SETTINGS_KEY) {
            self.job_specification
                .set_values(job_specification, raw_from_storage);
        }
        if self.has_validation_errors() {
            debug!("settings absorbed validation errors while applying raw values");
        }
    }

    /// Normalized settings tree, safe to persist verbatim.
    pub fn value(&self) -> serde_json::Value {
        json!({
            "general": self.general.value(),
            SETTINGS_KEY: self.job_specification.value(),
        })
    }

    pub fn has_validation_errors(&self) -> bool {
        self.general.has_validation_errors() || self.job_specification.has_validation_errors()
    }

    /// All recorded validation failures, keyed by dotted settings path.
    pub fn validation_errors(&self) -> Vec<(String, FieldError)> {
        let mut errors = Vec::new();
        for (path, error) in self.general.validation_errors() {
            errors.push((format!("general.{path}"), error));
        }
        for (path, error) in self.job_specification.validation_errors() {
            errors.push((format!("{SETTINGS_KEY}.{path}"), error));
        }
        errors
    }

    pub fn general(&self) -> &FieldsGroup {
        &self.general
    }

    pub fn job_specification(&self) -> &DynamicFieldsGroup {
        &self.job_specification
    }

    /// The job specification entries resolved into concrete per-job fields,
    /// or `None` while the configuration has unresolved validation errors.
    pub fn job_fields(&self) -> Option<FieldsGroup> {
        self.job_specification
            .dynamic_fields(format!("{SETTINGS_KEY}_fields"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
