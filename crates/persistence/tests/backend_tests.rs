//! Backend integration tests.
//!
//! The same query suite runs against every backend so that predicate
//! semantics stay identical between the in-memory store and SQLite.

mod common;

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use common::inventory;
use rackline_persistence::backends::memory::MemoryStore;
use rackline_persistence::core::{ResourceLoader, ResourceStore};
use rackline_persistence::error::{QueryError, StorageError};
use rackline_persistence::types::{
    Lookup, Pagination, Predicate, PredicateValue, SortKey, StoreQuery,
};

async fn memory_store() -> Arc<dyn ResourceStore> {
    let store = MemoryStore::new();
    store.load(inventory()).await.unwrap();
    Arc::new(store)
}

#[cfg(feature = "sqlite")]
async fn sqlite_store() -> Arc<dyn ResourceStore> {
    use rackline_persistence::backends::sqlite::SqliteStore;

    let store = SqliteStore::in_memory().expect("Failed to create SQLite store");
    store.init_schema().expect("Failed to initialize schema");
    store.load(inventory()).await.unwrap();
    Arc::new(store)
}

async fn ids(store: &dyn ResourceStore, resource_type: &str, predicates: Vec<Predicate>) -> Vec<String> {
    let query = StoreQuery::new(resource_type)
        .with_predicates(predicates)
        .with_ordering(vec![SortKey::asc("id")])
        .with_pagination(Pagination::unbounded());
    store
        .fetch(&query)
        .await
        .unwrap()
        .items
        .into_iter()
        .map(|r| r.id)
        .collect()
}

macro_rules! backend_suite {
    ($module:ident, $create:ident) => {
        mod $module {
            use super::*;

            #[tokio::test]
            async fn test_membership_on_reference() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "site",
                    vec![Predicate::one_of(
                        "region_id",
                        vec![PredicateValue::text("region-42")],
                    )],
                )
                .await;
                assert_eq!(found, vec!["site-a", "site-b"]);
            }

            #[tokio::test]
            async fn test_contains_is_case_insensitive() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "device",
                    vec![Predicate::contains("serial", "AB12")],
                )
                .await;
                assert_eq!(found, vec!["dev-1"]);
            }

            #[tokio::test]
            async fn test_text_patterns_fold_non_ascii() {
                let store = $create().await;
                let cases = [
                    (Lookup::IContains, "éclair", vec!["loc-1"]),
                    (Lookup::IStartsWith, "Éclair-", vec!["loc-1"]),
                    (Lookup::IEndsWith, "IR-1", vec!["loc-1"]),
                    (Lookup::IExact, "éclair-1", vec!["loc-1"]),
                    (Lookup::IExact, "ECLAIR-2", vec!["loc-2"]),
                ];
                for (lookup, text, expected) in cases {
                    let found = ids(
                        store.as_ref(),
                        "location",
                        vec![Predicate::new("facility", lookup, PredicateValue::text(text))],
                    )
                    .await;
                    assert_eq!(found, expected, "{:?} {}", lookup, text);
                }
            }

            #[tokio::test]
            async fn test_search_folds_non_ascii() {
                let store = $create().await;
                let found = ids(store.as_ref(), "location", vec![Predicate::search("ZÜRICH")]).await;
                assert_eq!(found, vec!["loc-1"]);

                let found = ids(store.as_ref(), "location", vec![Predicate::search("éclair")]).await;
                assert_eq!(found, vec!["loc-1"]);
            }

            #[tokio::test]
            async fn test_like_wildcards_are_literal() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "site",
                    vec![Predicate::contains("facility", "5%")],
                )
                .await;
                assert_eq!(found, vec!["site-a"]);

                let found = ids(
                    store.as_ref(),
                    "site",
                    vec![Predicate::contains("facility", "g_5")],
                )
                .await;
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_array_attribute_membership() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::one_of("tags", vec![PredicateValue::text("gold")])],
                )
                .await;
                assert_eq!(found, vec!["rack-1"]);
            }

            #[tokio::test]
            async fn test_null_membership() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::one_of(
                        "location_id",
                        vec![PredicateValue::Null],
                    )],
                )
                .await;
                assert_eq!(found, vec!["rack-2", "rack-3"]);

                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::one_of(
                        "location_id",
                        vec![PredicateValue::text("loc-1"), PredicateValue::Null],
                    )],
                )
                .await;
                assert_eq!(found, vec!["rack-1", "rack-2", "rack-3"]);
            }

            #[tokio::test]
            async fn test_integer_and_decimal_ranges() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::new("u_height", Lookup::Gte, PredicateValue::Integer(42))],
                )
                .await;
                assert_eq!(found, vec!["rack-1", "rack-2"]);

                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::new(
                        "weight",
                        Lookup::Gt,
                        PredicateValue::Decimal(Decimal::new(1000, 1)),
                    )],
                )
                .await;
                assert_eq!(found, vec!["rack-1"]);

                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::new(
                        "weight",
                        Lookup::Lte,
                        PredicateValue::Decimal(Decimal::new(80, 0)),
                    )],
                )
                .await;
                assert_eq!(found, vec!["rack-3"]);
            }

            #[tokio::test]
            async fn test_datetime_bounds_across_offsets() {
                let store = $create().await;
                let bound = Utc.with_ymd_and_hms(2024, 5, 31, 21, 0, 0).unwrap();

                let after = ids(
                    store.as_ref(),
                    "device",
                    vec![Predicate::new("created", Lookup::Gte, PredicateValue::DateTime(bound))],
                )
                .await;
                assert_eq!(after, vec!["dev-2"]);

                let before = ids(
                    store.as_ref(),
                    "device",
                    vec![Predicate::new("created", Lookup::Lte, PredicateValue::DateTime(bound))],
                )
                .await;
                assert_eq!(before, vec!["dev-1"]);
            }

            #[tokio::test]
            async fn test_boolean_exact() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "device",
                    vec![Predicate::exact("has_primary_ip", PredicateValue::Boolean(true))],
                )
                .await;
                assert_eq!(found, vec!["dev-1"]);
            }

            #[tokio::test]
            async fn test_negated_exact() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "site",
                    vec![Predicate::exact("status", PredicateValue::text("active")).negate()],
                )
                .await;
                assert_eq!(found, vec!["site-b"]);
            }

            #[tokio::test]
            async fn test_isnull_and_empty() {
                let store = $create().await;
                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::new("location_id", Lookup::IsNull, PredicateValue::Boolean(true))],
                )
                .await;
                assert_eq!(found, vec!["rack-2", "rack-3"]);

                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::new("tags", Lookup::Empty, PredicateValue::Boolean(true))],
                )
                .await;
                assert_eq!(found, vec!["rack-2", "rack-3"]);

                let found = ids(
                    store.as_ref(),
                    "rack",
                    vec![Predicate::new("tags", Lookup::Empty, PredicateValue::Boolean(false))],
                )
                .await;
                assert_eq!(found, vec!["rack-1"]);
            }

            #[tokio::test]
            async fn test_search_label_and_attributes() {
                let store = $create().await;
                let found = ids(store.as_ref(), "device", vec![Predicate::search("EDGE")]).await;
                assert_eq!(found, vec!["dev-2"]);

                let found = ids(store.as_ref(), "rack", vec![Predicate::search("edge")]).await;
                assert_eq!(found, vec!["rack-1"]);
            }

            #[tokio::test]
            async fn test_ordering_and_pagination() {
                let store = $create().await;
                let query = StoreQuery::new("rack")
                    .with_ordering(vec![SortKey::desc("u_height")])
                    .with_pagination(Pagination::new(0, 2))
                    .with_total();
                let page = store.fetch(&query).await.unwrap();
                let found: Vec<_> = page.items.iter().map(|r| r.id.as_str()).collect();
                assert_eq!(found, vec!["rack-2", "rack-1"]);
                assert_eq!(page.page_info.next_offset, Some(2));
                assert_eq!(page.page_info.total, Some(3));

                let page = store
                    .fetch(&query.clone().with_pagination(Pagination::new(2, 2)))
                    .await
                    .unwrap();
                assert_eq!(page.items[0].id, "rack-3");
                assert!(!page.page_info.has_next());
            }

            #[tokio::test]
            async fn test_maximal_limit_returns_rest() {
                let store = $create().await;
                let query = StoreQuery::new("rack").with_pagination(Pagination::new(1, usize::MAX));
                let page = store.fetch(&query).await.unwrap();
                assert_eq!(page.len(), 2);
                assert!(!page.page_info.has_next());
            }

            #[tokio::test]
            async fn test_default_ordering_by_label() {
                let store = $create().await;
                let page = store.fetch(&StoreQuery::new("region")).await.unwrap();
                let labels: Vec<_> = page.items.iter().map(|r| r.label.as_str()).collect();
                assert_eq!(labels, vec!["North", "South"]);
            }

            #[tokio::test]
            async fn test_count() {
                let store = $create().await;
                let count = store
                    .count(
                        "site",
                        &[Predicate::exact("status", PredicateValue::text("active"))],
                    )
                    .await
                    .unwrap();
                assert_eq!(count, 2);
            }

            #[tokio::test]
            async fn test_resource_types() {
                let store = $create().await;
                let types = store.resource_types().await.unwrap();
                assert_eq!(types, vec!["device", "location", "rack", "region", "site"]);
            }

            #[tokio::test]
            async fn test_rejects_invalid_attribute() {
                let store = $create().await;
                let query = StoreQuery::new("site").with_predicate(Predicate::exact(
                    "region_id') OR ('1",
                    PredicateValue::text("x"),
                ));
                let result = store.fetch(&query).await;
                assert!(matches!(
                    result,
                    Err(StorageError::Query(QueryError::InvalidAttribute { .. }))
                ));
            }
        }
    };
}

backend_suite!(memory, memory_store);

#[cfg(feature = "sqlite")]
backend_suite!(sqlite, sqlite_store);

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_sqlite_file_persists_between_opens() {
    use rackline_persistence::backends::sqlite::SqliteStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rackline.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.init_schema().unwrap();
        store.load(inventory()).await.unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    store.init_schema().unwrap();
    let count = store.count("site", &[]).await.unwrap();
    assert_eq!(count, 3);
}
