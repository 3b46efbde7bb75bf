//! The resource store port.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{Page, Predicate, ResourceRecord, StoreQuery};

/// Read access to stored resources.
///
/// This is the only storage contract the query layer consumes. Backends must
/// support AND-combined predicates, membership sets, ordering, and offset
/// pagination. Implementations are read-only from the query layer's point of
/// view and may be shared across concurrent requests.
///
/// # Example
///
/// ```ignore
/// use rackline_persistence::core::ResourceStore;
/// use rackline_persistence::types::StoreQuery;
///
/// async fn sites<S: ResourceStore>(store: &S) -> StorageResult<usize> {
///     let page = store.fetch(&StoreQuery::new("site")).await?;
///     Ok(page.len())
/// }
/// ```
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns one page of records matching the query.
    async fn fetch(&self, query: &StoreQuery) -> StorageResult<Page<ResourceRecord>>;

    /// Counts the records of `resource_type` matching all predicates.
    async fn count(&self, resource_type: &str, predicates: &[Predicate]) -> StorageResult<usize>;

    /// Lists the resource types that have at least one stored record.
    async fn resource_types(&self) -> StorageResult<Vec<String>>;
}

/// Write access used to seed a store.
///
/// Loading replaces records with the same resource type and id.
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    /// Stores the records and returns how many were written.
    async fn load(&self, records: Vec<ResourceRecord>) -> StorageResult<usize>;
}

#[async_trait]
impl<S: ResourceStore + ?Sized> ResourceStore for Arc<S> {
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn fetch(&self, query: &StoreQuery) -> StorageResult<Page<ResourceRecord>> {
        (**self).fetch(query).await
    }

    async fn count(&self, resource_type: &str, predicates: &[Predicate]) -> StorageResult<usize> {
        (**self).count(resource_type, predicates).await
    }

    async fn resource_types(&self) -> StorageResult<Vec<String>> {
        (**self).resource_types().await
    }
}
