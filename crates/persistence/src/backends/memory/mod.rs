//! In-memory storage backend.
//!
//! Holds every record in a `parking_lot::RwLock` and evaluates predicates
//! directly. Used for tests and for serving fixture data without a database.

mod backend;
mod matcher;

pub use backend::MemoryStore;
