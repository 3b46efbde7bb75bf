//! In-memory backend implementation.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::core::{ResourceLoader, ResourceStore};
use crate::error::StorageResult;
use crate::types::{Page, Predicate, ResourceRecord, StoreQuery, paginate};

use super::matcher::{compare_records, matches};

/// Records held in process memory, keyed by resource type and id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, BTreeMap<String, ResourceRecord>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given records.
    pub fn with_records(records: impl IntoIterator<Item = ResourceRecord>) -> Self {
        let store = Self::new();
        store.insert_records(records);
        store
    }

    /// Inserts or replaces a record.
    pub fn insert(&self, record: ResourceRecord) {
        self.records
            .write()
            .entry(record.resource_type.clone())
            .or_default()
            .insert(record.id.clone(), record);
    }

    /// Inserts or replaces several records.
    pub fn insert_records(&self, records: impl IntoIterator<Item = ResourceRecord>) -> usize {
        let mut guard = self.records.write();
        let mut written = 0;
        for record in records {
            guard
                .entry(record.resource_type.clone())
                .or_default()
                .insert(record.id.clone(), record);
            written += 1;
        }
        written
    }

    /// Returns the number of stored records across all types.
    pub fn len(&self) -> usize {
        self.records.read().values().map(BTreeMap::len).sum()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn matching(&self, resource_type: &str, predicates: &[Predicate]) -> Vec<ResourceRecord> {
        let guard = self.records.read();
        guard
            .get(resource_type)
            .map(|by_id| {
                by_id
                    .values()
                    .filter(|record| predicates.iter().all(|p| matches(record, p)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, query: &StoreQuery) -> StorageResult<Page<ResourceRecord>> {
        query.check()?;

        let mut matched = self.matching(&query.resource_type, &query.predicates);
        matched.sort_by(|a, b| compare_records(a, b, &query.ordering));

        let total = matched.len();
        debug!(
            resource_type = %query.resource_type,
            predicates = query.predicates.len(),
            matched = total,
            "Evaluated in-memory query"
        );

        let pagination = query.pagination;
        let window: Vec<ResourceRecord> = match pagination.limit {
            Some(limit) => matched
                .into_iter()
                .skip(pagination.offset)
                .take(limit.saturating_add(1))
                .collect(),
            None => matched.into_iter().skip(pagination.offset).collect(),
        };

        Ok(paginate(
            window,
            pagination,
            query.include_total.then_some(total),
        ))
    }

    async fn count(&self, resource_type: &str, predicates: &[Predicate]) -> StorageResult<usize> {
        for predicate in predicates {
            predicate.check()?;
        }
        Ok(self.matching(resource_type, predicates).len())
    }

    async fn resource_types(&self) -> StorageResult<Vec<String>> {
        let mut types: Vec<String> = self
            .records
            .read()
            .iter()
            .filter(|(_, by_id)| !by_id.is_empty())
            .map(|(rt, _)| rt.clone())
            .collect();
        types.sort();
        Ok(types)
    }
}

#[async_trait]
impl ResourceLoader for MemoryStore {
    async fn load(&self, records: Vec<ResourceRecord>) -> StorageResult<usize> {
        Ok(self.insert_records(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pagination, PredicateValue, SortKey};

    fn store() -> MemoryStore {
        MemoryStore::with_records([
            ResourceRecord::new("site", "s1", "Bravo").with_attribute("region_id", "r1"),
            ResourceRecord::new("site", "s2", "Alpha").with_attribute("region_id", "r2"),
            ResourceRecord::new("site", "s3", "Charlie").with_attribute("region_id", "r1"),
            ResourceRecord::new("region", "r1", "North"),
        ])
    }

    #[tokio::test]
    async fn test_fetch_default_order_by_label() {
        let page = store().fetch(&StoreQuery::new("site")).await.unwrap();
        let labels: Vec<_> = page.items.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Bravo", "Charlie"]);
    }

    #[tokio::test]
    async fn test_fetch_with_maximal_limit() {
        let query = StoreQuery::new("site").with_pagination(Pagination::new(1, usize::MAX));
        let page = store().fetch(&query).await.unwrap();
        assert_eq!(page.len(), 2);
        assert!(!page.page_info.has_next());
    }

    #[tokio::test]
    async fn test_fetch_filters_and_counts() {
        let query = StoreQuery::new("site")
            .with_predicate(Predicate::exact("region_id", PredicateValue::text("r1")))
            .with_total();
        let page = store().fetch(&query).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.page_info.total, Some(2));
    }

    #[tokio::test]
    async fn test_fetch_pages() {
        let query = StoreQuery::new("site")
            .with_ordering(vec![SortKey::desc("label")])
            .with_pagination(Pagination::new(0, 2));
        let page = store().fetch(&query).await.unwrap();
        assert_eq!(page.items[0].label, "Charlie");
        assert_eq!(page.page_info.next_offset, Some(2));

        let query = query.with_pagination(Pagination::new(2, 2));
        let page = store().fetch(&query).await.unwrap();
        assert_eq!(page.len(), 1);
        assert!(!page.page_info.has_next());
    }

    #[tokio::test]
    async fn test_unknown_type_is_empty() {
        let page = store().fetch(&StoreQuery::new("rack")).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_resource_types_sorted() {
        assert_eq!(
            store().resource_types().await.unwrap(),
            vec!["region".to_string(), "site".to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_replaces_by_id() {
        let store = store();
        let written = store
            .load(vec![ResourceRecord::new("site", "s1", "Bravo Two")])
            .await
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(store.len(), 4);
    }
}
