//! Shared fixtures for HTTP tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{Value, json};

use rackline_filters::{Tag, catalog};
use rackline_persistence::backends::memory::MemoryStore;
use rackline_persistence::core::ResourceStore;
use rackline_persistence::error::{BackendError, StorageResult};
use rackline_persistence::types::{Page, Predicate, ResourceRecord, StoreQuery};
use rackline_rest::{ServerConfig, create_app_with_config};

/// Regions, sites, locations, racks and tags.
pub fn inventory() -> Vec<ResourceRecord> {
    let mut records = vec![
        ResourceRecord::new("region", "region-42", "North"),
        ResourceRecord::new("region", "region-7", "South"),
        ResourceRecord::new("site", "site-a", "Alpha DC")
            .with_attribute("region_id", "region-42")
            .with_attribute("status", "active"),
        ResourceRecord::new("site", "site-b", "Bravo DC")
            .with_attribute("region_id", "region-42")
            .with_attribute("status", "planned"),
        ResourceRecord::new("site", "site-c", "Charlie DC")
            .with_attribute("region_id", "region-7")
            .with_attribute("status", "active"),
        ResourceRecord::new("location", "loc-a1", "Alpha Hall 1").with_attribute("site_id", "site-a"),
        ResourceRecord::new("location", "loc-c1", "Charlie Cage").with_attribute("site_id", "site-c"),
        ResourceRecord::new("rack", "rack-1", "R1")
            .with_attribute("site_id", "site-a")
            .with_attribute("location_id", "loc-a1")
            .with_attribute("status", "active")
            .with_attribute("serial", "xx-ab12-yy")
            .with_attribute("tags", json!(["gold"])),
        ResourceRecord::new("rack", "rack-2", "R2")
            .with_attribute("site_id", "site-a")
            .with_attribute("location_id", Value::Null)
            .with_attribute("status", "planned"),
        ResourceRecord::new("rack", "rack-3", "R3")
            .with_attribute("site_id", "site-c")
            .with_attribute("location_id", "loc-c1")
            .with_attribute("status", "active"),
        ResourceRecord::new("config-revision", "rev-1", "Initial"),
    ];
    records.push(Tag::new("tag-1", "Gold").to_record());
    records
}

/// A test server over an in-memory store holding the inventory.
pub fn server() -> TestServer {
    server_with(Arc::new(MemoryStore::with_records(inventory())))
}

/// A test server over the given store and the built-in forms.
pub fn server_with(store: Arc<dyn ResourceStore>) -> TestServer {
    let registry = Arc::new(catalog::builtin_registry().expect("built-in forms are valid"));
    let app = create_app_with_config(store, registry, ServerConfig::for_testing());
    TestServer::new(app).expect("Failed to create test server")
}

/// Ids of the `results` of a list body.
pub fn ids(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|r| r["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Values of the `results` of a choices body.
pub fn choice_values(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .expect("results array")
        .iter()
        .map(|c| c["value"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// A store whose every call fails.
pub struct UnavailableStore;

#[async_trait]
impl ResourceStore for UnavailableStore {
    fn backend_name(&self) -> &'static str {
        "unavailable"
    }

    async fn fetch(&self, _query: &StoreQuery) -> StorageResult<Page<ResourceRecord>> {
        Err(unavailable())
    }

    async fn count(&self, _resource_type: &str, _predicates: &[Predicate]) -> StorageResult<usize> {
        Err(unavailable())
    }

    async fn resource_types(&self) -> StorageResult<Vec<String>> {
        Err(unavailable())
    }
}

fn unavailable() -> rackline_persistence::error::StorageError {
    BackendError::Unavailable {
        backend_name: "unavailable".to_string(),
        message: "store offline".to_string(),
    }
    .into()
}
