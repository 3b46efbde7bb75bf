//! # rackline-persistence
//!
//! Storage port and backends for the Rackline query layer.
//!
//! The query layer never talks to a database directly. It builds a
//! [`StoreQuery`](types::StoreQuery) (AND-combined predicates, ordering, and
//! offset pagination for one resource type) and hands it to a
//! [`ResourceStore`](core::ResourceStore).
//!
//! ## Backends
//!
//! | Backend | Feature | Notes |
//! |---------|---------|-------|
//! | [`MemoryStore`](backends::memory::MemoryStore) | always | Predicates evaluated in process |
//! | [`SqliteStore`](backends::sqlite::SqliteStore) | `sqlite` (default) | Attributes stored as JSON, queried with `json_each` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use rackline_persistence::backends::memory::MemoryStore;
//! use rackline_persistence::core::ResourceStore;
//! use rackline_persistence::types::{Predicate, PredicateValue, ResourceRecord, StoreQuery};
//!
//! let store = MemoryStore::with_records([
//!     ResourceRecord::new("site", "site-1", "DC East").with_attribute("region_id", "region-42"),
//! ]);
//!
//! let query = StoreQuery::new("site")
//!     .with_predicate(Predicate::exact("region_id", PredicateValue::text("region-42")));
//! let page = store.fetch(&query).await?;
//! ```

#![warn(missing_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use error::{StorageError, StorageResult};
