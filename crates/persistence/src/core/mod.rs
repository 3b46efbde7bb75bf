//! Storage traits.

mod store;

pub use store::{ResourceLoader, ResourceStore};
