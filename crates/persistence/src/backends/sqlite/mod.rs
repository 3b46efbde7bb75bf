//! SQLite backend implementation.
//!
//! Supports in-memory databases (great for testing) and file-based
//! databases.
//!
//! # Example
//!
//! ```no_run
//! use rackline_persistence::backends::sqlite::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::in_memory()?;
//! store.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE resources (
//!     resource_type TEXT NOT NULL,
//!     id TEXT NOT NULL,
//!     label TEXT NOT NULL,
//!     attributes TEXT NOT NULL DEFAULT '{}',  -- JSON object
//!     PRIMARY KEY (resource_type, id)
//! );
//! ```

mod backend;
mod query_builder;
mod schema;

pub use backend::{SqliteStore, SqliteStoreConfig};
pub use query_builder::{SqlFragment, SqlParam};
