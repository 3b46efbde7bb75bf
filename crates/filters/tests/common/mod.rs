//! Shared inventory for filter integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use rackline_filters::{ListResolver, Tag, catalog};
use rackline_persistence::backends::memory::MemoryStore;
use rackline_persistence::core::{ResourceLoader, ResourceStore};
use rackline_persistence::types::ResourceRecord;

/// Two regions, two site groups, four sites with locations, racks and devices.
pub fn inventory() -> Vec<ResourceRecord> {
    let mut records = vec![
        ResourceRecord::new("region", "region-42", "North"),
        ResourceRecord::new("region", "region-7", "South"),
        ResourceRecord::new("site-group", "sg-core", "Core"),
        ResourceRecord::new("site-group", "sg-edge", "Edge"),
        ResourceRecord::new("site", "site-a", "Alpha DC")
            .with_attribute("region_id", "region-42")
            .with_attribute("group_id", "sg-core")
            .with_attribute("status", "active"),
        ResourceRecord::new("site", "site-b", "Bravo DC")
            .with_attribute("region_id", "region-42")
            .with_attribute("group_id", "sg-edge")
            .with_attribute("status", "planned"),
        ResourceRecord::new("site", "site-c", "Charlie DC")
            .with_attribute("region_id", "region-7")
            .with_attribute("group_id", "sg-core")
            .with_attribute("status", "active"),
        ResourceRecord::new("site", "site-d", "Delta POP")
            .with_attribute("region_id", Value::Null)
            .with_attribute("status", "retired"),
        ResourceRecord::new("location", "loc-a1", "Alpha Hall 1").with_attribute("site_id", "site-a"),
        ResourceRecord::new("location", "loc-a2", "Alpha Hall 2").with_attribute("site_id", "site-a"),
        ResourceRecord::new("location", "loc-c1", "Charlie Cage").with_attribute("site_id", "site-c"),
        ResourceRecord::new("rack", "rack-1", "R1")
            .with_attribute("site_id", "site-a")
            .with_attribute("location_id", "loc-a1")
            .with_attribute("status", "active")
            .with_attribute("serial", "xx-ab12-yy")
            .with_attribute("weight", 120.5)
            .with_attribute("tags", json!(["gold", "edge"])),
        ResourceRecord::new("rack", "rack-2", "R2")
            .with_attribute("site_id", "site-a")
            .with_attribute("location_id", Value::Null)
            .with_attribute("status", "planned")
            .with_attribute("serial", "ZZ99")
            .with_attribute("tags", json!([])),
        ResourceRecord::new("rack", "rack-3", "R3")
            .with_attribute("site_id", "site-c")
            .with_attribute("location_id", "loc-c1")
            .with_attribute("status", "active")
            .with_attribute("weight", 80),
        ResourceRecord::new("device", "dev-1", "core-sw-01")
            .with_attribute("site_id", "site-a")
            .with_attribute("rack_id", "rack-1")
            .with_attribute("status", "active")
            .with_attribute("has_primary_ip", true)
            .with_attribute("serial", "SW-0001"),
        ResourceRecord::new("device", "dev-2", "edge-rtr-01")
            .with_attribute("site_id", "site-c")
            .with_attribute("rack_id", "rack-3")
            .with_attribute("status", "offline")
            .with_attribute("has_primary_ip", false),
        ResourceRecord::new("device", "dev-3", "Zürich-fw-01")
            .with_attribute("site_id", "site-b")
            .with_attribute("status", "planned")
            .with_attribute("has_primary_ip", true)
            .with_attribute("serial", "ÉCLAIR-ß9"),
        ResourceRecord::new("data-source", "ds-git", "Git templates").with_attribute("enabled", true),
        ResourceRecord::new("data-source", "ds-local", "Local files").with_attribute("enabled", false),
        ResourceRecord::new("data-file", "df-1", "devices.j2").with_attribute("source_id", "ds-git"),
        ResourceRecord::new("data-file", "df-2", "racks.j2").with_attribute("source_id", "ds-git"),
        ResourceRecord::new("data-file", "df-3", "notes.txt").with_attribute("source_id", "ds-local"),
        ResourceRecord::new("config-revision", "rev-1", "Initial"),
    ];
    records.extend([Tag::new("tag-1", "Gold"), Tag::new("tag-2", "Edge")].iter().map(Tag::to_record));
    records
}

/// An in-memory store loaded with the inventory.
pub async fn memory_store() -> Arc<dyn ResourceStore> {
    let store = MemoryStore::new();
    store.load(inventory()).await.unwrap();
    Arc::new(store)
}

/// A SQLite store loaded with the inventory.
pub async fn sqlite_store() -> Arc<dyn ResourceStore> {
    use rackline_persistence::backends::sqlite::SqliteStore;

    let store = SqliteStore::in_memory().expect("Failed to create SQLite store");
    store.init_schema().expect("Failed to initialize schema");
    store.load(inventory()).await.unwrap();
    Arc::new(store)
}

/// A resolver over the built-in registry.
pub fn resolver(store: Arc<dyn ResourceStore>) -> ListResolver<dyn ResourceStore> {
    let registry = catalog::builtin_registry().expect("built-in forms are valid");
    ListResolver::new(store, Arc::new(registry))
}

/// Values of a choice list.
pub fn values(choices: &[rackline_filters::Choice]) -> Vec<String> {
    choices.iter().map(|c| c.value.clone()).collect()
}
