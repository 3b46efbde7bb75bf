//! Tags.
//!
//! Tags are stored as ordinary `tag` records whose `slug` is the value the
//! `tag` filter field matches against a record's `tags` array.

use std::sync::LazyLock;

use rackline_persistence::types::ResourceRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;

/// Resource type of tag records.
pub const TAG_RESOURCE_TYPE: &str = "tag";

/// Default tag color (grey).
pub const DEFAULT_COLOR: &str = "9e9e9e";

const MAX_DESCRIPTION: usize = 200;

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug pattern is valid"));
static SLUG_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").expect("separator pattern is valid"));
static COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9a-f]{6}$").expect("color pattern is valid"));

/// Derives a slug from a tag name.
///
/// Unicode word characters are kept, everything else except whitespace and
/// hyphens is dropped, runs of whitespace and hyphens become one `-`. A
/// disambiguation index is appended as `_<i>`.
pub fn slugify(name: &str, index: Option<u32>) -> String {
    let cleaned = NON_SLUG.replace_all(name, "").to_lowercase();
    let mut slug = SLUG_SEPARATORS
        .replace_all(cleaned.trim(), "-")
        .trim_matches(|c| c == '-' || c == '_')
        .to_string();
    if let Some(i) = index {
        slug.push_str(&format!("_{}", i));
    }
    slug
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// A tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL-safe unique name; derived from `name` when empty.
    #[serde(default)]
    pub slug: String,
    /// Six lowercase hex digits.
    #[serde(default = "default_color")]
    pub color: String,
    /// Free text, at most 200 characters.
    #[serde(default)]
    pub description: String,
    /// Resource types the tag may be applied to; empty means all.
    #[serde(default)]
    pub object_types: Vec<String>,
}

impl Tag {
    /// Creates a tag with a derived slug and the default color.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            slug: slugify(&name, None),
            name,
            color: default_color(),
            description: String::new(),
            object_types: Vec::new(),
        }
    }

    /// Checks the tag's fields.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "This field is required.");
        }
        if self.slug.is_empty() || slugify(&self.slug, None) != self.slug {
            errors.add(
                "slug",
                "Enter a valid \"slug\" consisting of letters, numbers, underscores or hyphens.",
            );
        }
        if !COLOR.is_match(&self.color) {
            errors.add("color", "Enter a valid hexadecimal RGB color code.");
        }
        let length = self.description.chars().count();
        if length > MAX_DESCRIPTION {
            errors.add(
                "description",
                format!(
                    "Ensure this value has at most {} characters (it has {}).",
                    MAX_DESCRIPTION, length
                ),
            );
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Returns true if the tag may be applied to the resource type.
    pub fn applies_to(&self, resource_type: &str) -> bool {
        self.object_types.is_empty() || self.object_types.iter().any(|t| t == resource_type)
    }

    /// Converts the tag into a store record.
    pub fn to_record(&self) -> ResourceRecord {
        let slug = if self.slug.is_empty() {
            slugify(&self.name, None)
        } else {
            self.slug.clone()
        };
        ResourceRecord::new(TAG_RESOURCE_TYPE, self.id.as_str(), self.name.as_str())
            .with_attribute("slug", slug)
            .with_attribute("color", self.color.as_str())
            .with_attribute("description", self.description.as_str())
            .with_attribute("object_types", self.object_types.clone())
    }
}
