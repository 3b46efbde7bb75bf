//! Storage backend implementations.
//!
//! - [`memory`] - In-process store, always available
//! - [`sqlite`] - SQLite store (feature `sqlite`, enabled by default)

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;
