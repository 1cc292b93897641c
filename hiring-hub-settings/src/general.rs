//! The "general" settings group: archive and single-post slugs.

use hiring_hub_fields::{policies, FieldConfig, GroupConfig};

/// Default value for the archive page slug
pub const DEFAULT_ARCHIVE_SLUG: &str = "jobs";

/// Default value for the single job post slug
pub const DEFAULT_POST_SLUG: &str = "job";

/// Configuration of the "general" group.
///
/// Both slugs must sanitize to a non-empty slug; incorrect values restore
/// to their defaults.
pub fn general_group() -> GroupConfig {
    GroupConfig::new()
        .field("archive_slug", slug_field(DEFAULT_ARCHIVE_SLUG))
        .field("post_slug", slug_field(DEFAULT_POST_SLUG))
}

fn slug_field(default: &'static str) -> FieldConfig {
    FieldConfig::string(default)
        .with_sanitizer(policies::slug_sanitizer())
        .with_validator(policies::slug_validator())
        .with_restorer(move |_raw, _context| {
            hiring_hub_fields::FieldValue::String(default.to_string())
        })
}
