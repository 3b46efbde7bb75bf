//! Core types for the persistence layer.
//!
//! - [`ResourceRecord`] - A stored resource with its filterable attributes
//! - [`Predicate`] - A single storage-agnostic constraint
//! - [`StoreQuery`] - Predicates, ordering, and pagination for one resource type
//! - [`Page`] - A slice of ordered results

mod pagination;
mod predicate;
mod query;
mod record;

pub use pagination::{Page, PageInfo, Pagination, paginate};
pub use predicate::{Lookup, Predicate, PredicateValue, validate_attribute_name};
pub use query::{SortKey, StoreQuery, default_ordering};
pub use record::ResourceRecord;
