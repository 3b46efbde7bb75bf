//! Shared fixtures for backend integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};

use rackline_persistence::types::ResourceRecord;

/// A small inventory: two regions, three sites, locations, racks and devices.
pub fn inventory() -> Vec<ResourceRecord> {
    vec![
        ResourceRecord::new("region", "region-42", "North"),
        ResourceRecord::new("region", "region-7", "South"),
        ResourceRecord::new("site", "site-a", "Alpha DC")
            .with_attribute("region_id", "region-42")
            .with_attribute("status", "active")
            .with_attribute("facility", "Building 5%"),
        ResourceRecord::new("site", "site-b", "Bravo DC")
            .with_attribute("region_id", "region-42")
            .with_attribute("status", "planned"),
        ResourceRecord::new("site", "site-c", "Charlie DC")
            .with_attribute("region_id", "region-7")
            .with_attribute("status", "active"),
        ResourceRecord::new("rack", "rack-1", "R1")
            .with_attribute("site_id", "site-a")
            .with_attribute("location_id", "loc-1")
            .with_attribute("u_height", 42)
            .with_attribute("weight", 120.5)
            .with_attribute("tags", json!(["gold", "edge"])),
        ResourceRecord::new("rack", "rack-2", "R2")
            .with_attribute("site_id", "site-a")
            .with_attribute("location_id", Value::Null)
            .with_attribute("u_height", 48)
            .with_attribute("tags", json!([])),
        ResourceRecord::new("rack", "rack-3", "R3")
            .with_attribute("site_id", "site-c")
            .with_attribute("u_height", 24)
            .with_attribute("weight", 80),
        ResourceRecord::new("location", "loc-1", "Zürich Hall")
            .with_attribute("site_id", "site-a")
            .with_attribute("facility", "ÉCLAIR-1"),
        ResourceRecord::new("location", "loc-2", "Oslo Hall")
            .with_attribute("site_id", "site-c")
            .with_attribute("facility", "eclair-2"),
        ResourceRecord::new("device", "dev-1", "core-sw-01")
            .with_attribute("serial", "xx-ab12-yy")
            .with_attribute("rack_id", "rack-1")
            .with_attribute("has_primary_ip", true)
            .with_attribute("created", "2024-01-10T08:00:00Z"),
        ResourceRecord::new("device", "dev-2", "edge-rtr-01")
            .with_attribute("serial", "ZZ99")
            .with_attribute("rack_id", "rack-3")
            .with_attribute("has_primary_ip", false)
            .with_attribute("created", "2024-06-01T00:00:00+02:00"),
    ]
}
