//! Hiring Hub settings
//!
//! The concrete settings surface of Hiring Hub, built on the
//! `hiring-hub-fields` engine: the static "general" group (archive and
//! post slugs) and the "job_specification" dynamic fields group through
//! which administrators define the fields a job posting carries.
//!
//! Persistence, HTTP and rendering live elsewhere. This crate only owns
//! the configuration shape, its validation and its defaults.

pub mod defaults;
pub mod general;
pub mod job_specification;
pub mod settings;

pub use defaults::{default_entries, default_settings};
pub use general::{general_group, DEFAULT_ARCHIVE_SLUG, DEFAULT_POST_SLUG};
pub use job_specification::{templates, SALARY_CURRENCIES, SALARY_UNITS, SETTINGS_KEY};
pub use settings::Settings;
