//! Startup fixtures: records and tags loaded into the store.
//!
//! ```json
//! {
//!   "records": [
//!     {"resource_type": "site", "id": "site-a", "label": "Alpha DC",
//!      "attributes": {"region_id": "region-42", "status": "active"}}
//!   ],
//!   "tags": [{"id": "tag-1", "name": "Gold", "color": "ffd700"}]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use rackline_filters::{Tag, slugify};
use rackline_persistence::core::ResourceLoader;
use rackline_persistence::types::ResourceRecord;
use serde::Deserialize;
use tracing::info;

/// Contents of a fixtures file.
#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    /// Plain records.
    #[serde(default)]
    pub records: Vec<ResourceRecord>,
    /// Tags, stored as `tag` records.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Fixtures {
    /// Parses fixtures from JSON, deriving missing tag slugs and rejecting
    /// invalid tags.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut fixtures: Self = serde_json::from_str(json).context("malformed fixtures")?;
        for tag in &mut fixtures.tags {
            if tag.slug.is_empty() {
                tag.slug = slugify(&tag.name, None);
            }
            tag.validate()
                .map_err(|errors| anyhow::anyhow!("invalid tag '{}': {}", tag.id, errors))?;
        }
        Ok(fixtures)
    }

    /// Reads and parses a fixtures file.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixtures from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Flattens tags into records.
    pub fn into_records(self) -> Vec<ResourceRecord> {
        let mut records = self.records;
        records.extend(self.tags.iter().map(Tag::to_record));
        records
    }

    /// Loads the fixtures into a store, returning the number written.
    pub async fn load_into<L: ResourceLoader + ?Sized>(self, loader: &L) -> anyhow::Result<usize> {
        let loaded = loader.load(self.into_records()).await?;
        info!(records = loaded, "Loaded fixtures");
        Ok(loaded)
    }
}
