//! Validatable fields engine
//!
//! `hiring-hub-fields` is a standalone, storage-agnostic validation engine
//! for typed, user-configurable field groups. It knows nothing about posts,
//! settings screens or REST routes: consumers feed it raw configuration
//! and persisted values and read back normalized value trees.
//!
//! # Architecture
//!
//! - **Field**: one typed, named value with a default and optional
//!   sanitize/validate/restore policies. Invalid input never escapes as an
//!   error; it degrades to a restored or default value and stays queryable.
//! - **Fields group**: an ordered, keyed collection of fields and nested
//!   groups with bulk get/set and per-field isolation.
//! - **Dynamic fields group**: a group whose member set is itself data:
//!   stored configuration entries resolved against a registry of templates,
//!   each instance bound to its own entry configuration.
//! - **Policies**: reusable date/URL/slug/string-list policy factories
//!   shared by static fields and templates.

pub mod config;
pub mod context;
pub mod dynamic;
pub mod error;
pub mod field;
pub mod group;
pub mod policies;
pub mod value;

pub use config::{FieldConfig, GroupConfig, NodeConfig};
pub use context::FieldContext;
pub use dynamic::{DynamicFieldsGroup, FieldTemplate, TemplateRegistry};
pub use error::{FieldError, Result};
pub use field::{Field, FieldSchema, RestoreFn, SanitizeFn, ValidateFn};
pub use group::{FieldNode, FieldsGroup};
pub use value::{json_type_name, FieldValue, ValueType};
