//! Cascading dependent choices.
//!
//! A dependent field's candidates are the records of its resource type that
//! satisfy every active parent restriction. Fields are visited in
//! topological order so each parent has a settled value before its
//! dependents are queried.

use std::collections::{BTreeMap, HashMap};

use rackline_persistence::core::ResourceStore;
use rackline_persistence::types::{Pagination, Predicate, PredicateValue, StoreQuery};
use tracing::debug;

use crate::data::{FormData, distinct_nonblank};
use crate::error::{ResolveError, ResolveResult};
use crate::field::{Choice, ChoiceSource, FieldDeclaration, NULL_TOKEN, ParamValue};
use crate::form::{FilterForm, HasDependencies, HasFields};

/// Page size used when draining candidate queries.
pub const DEFAULT_CHOICE_PAGE_SIZE: usize = 500;

type MemoKey = (String, Vec<Predicate>);

/// Settled parent values; `None` means no restriction.
type Settled = HashMap<String, Option<Vec<PredicateValue>>>;

/// Computes restricted candidate sets for the dependent fields of a form.
///
/// Read-only and side-effect free. Identical candidate queries issued within
/// one call are executed once.
pub struct DependentChoiceResolver<'a, S: ResourceStore + ?Sized> {
    form: &'a FilterForm,
    store: &'a S,
    page_size: usize,
}

impl<'a, S: ResourceStore + ?Sized> DependentChoiceResolver<'a, S> {
    /// Creates a resolver over a form and a store.
    pub fn new(form: &'a FilterForm, store: &'a S) -> Self {
        Self {
            form,
            store,
            page_size: DEFAULT_CHOICE_PAGE_SIZE,
        }
    }

    /// Sets the page size used when draining candidate queries.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Resolves the candidate set of every dependent field.
    pub async fn resolve(&self, data: &FormData) -> ResolveResult<BTreeMap<String, Vec<Choice>>> {
        let mut memo = HashMap::new();
        let mut settled = Settled::new();
        let mut resolved = BTreeMap::new();

        let graph = self.form.dependencies();
        for name in graph.order() {
            let Some(field) = self.form.field(name) else {
                continue;
            };
            if graph.is_dependent(name) {
                let candidates = self.candidates(field, &settled, None, &mut memo).await?;
                settled.insert(name.clone(), settle_dependent(field, data, &candidates));
                resolved.insert(name.clone(), candidates);
            } else {
                settled.insert(name.clone(), settle_independent(field, data));
            }
        }

        debug!(
            resource_type = %self.form.resource_type(),
            fields = resolved.len(),
            queries = memo.len(),
            "Resolved dependent choices"
        );
        Ok(resolved)
    }

    /// Resolves the candidates of one field, optionally narrowed by a
    /// type-ahead search.
    ///
    /// Only the field's ancestors are settled first. Static choices are
    /// filtered by the search text on value and label.
    pub async fn resolve_field(
        &self,
        field_name: &str,
        data: &FormData,
        search: Option<&str>,
    ) -> ResolveResult<Vec<Choice>> {
        let field = self
            .form
            .field(field_name)
            .ok_or_else(|| ResolveError::UnknownField {
                resource_type: self.form.resource_type().to_string(),
                field: field_name.to_string(),
            })?;
        if matches!(field.choices, ChoiceSource::None) {
            return Err(ResolveError::NotAChoiceField {
                resource_type: self.form.resource_type().to_string(),
                field: field_name.to_string(),
            });
        }

        let mut memo = HashMap::new();
        let mut settled = Settled::new();
        let graph = self.form.dependencies();
        for name in graph.ancestors(field_name) {
            let Some(ancestor) = self.form.field(name) else {
                continue;
            };
            let value = if graph.is_dependent(name) {
                let candidates = self.candidates(ancestor, &settled, None, &mut memo).await?;
                settle_dependent(ancestor, data, &candidates)
            } else {
                settle_independent(ancestor, data)
            };
            settled.insert(name.to_string(), value);
        }

        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.candidates(field, &settled, search, &mut memo).await
    }

    async fn candidates(
        &self,
        field: &FieldDeclaration,
        settled: &Settled,
        search: Option<&str>,
        memo: &mut HashMap<MemoKey, Vec<Choice>>,
    ) -> ResolveResult<Vec<Choice>> {
        let query = match &field.choices {
            ChoiceSource::None => return Ok(Vec::new()),
            ChoiceSource::Static { choices } => {
                return Ok(choices
                    .iter()
                    .filter(|c| matches_search(c, search))
                    .cloned()
                    .collect());
            }
            ChoiceSource::Resource(query) => query,
        };

        let mut predicates = Vec::new();
        for param in &query.query_params {
            match &param.value {
                ParamValue::Field(parent) => {
                    if let Some(Some(values)) = settled.get(parent) {
                        predicates.push(Predicate::one_of(param.attribute.as_str(), values.clone()));
                    }
                }
                ParamValue::Literal(value) => {
                    predicates.push(Predicate::exact(
                        param.attribute.as_str(),
                        PredicateValue::text(value.as_str()),
                    ));
                }
            }
        }
        if let Some(text) = search {
            predicates.push(Predicate::search(text));
        }

        let key = (query.resource_type.clone(), predicates);
        let mut choices = match memo.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = self.fetch_all(&key.0, &key.1, &query.value_attribute).await?;
                memo.insert(key, fetched.clone());
                fetched
            }
        };

        if let Some(label) = &field.null_option {
            let none = Choice::new(NULL_TOKEN, label.as_str());
            if matches_search(&none, search) {
                choices.insert(0, none);
            }
        }
        Ok(choices)
    }

    async fn fetch_all(
        &self,
        resource_type: &str,
        predicates: &[Predicate],
        value_attribute: &str,
    ) -> ResolveResult<Vec<Choice>> {
        let base = StoreQuery::new(resource_type).with_predicates(predicates.to_vec());
        let mut pagination = Pagination::new(0, self.page_size);
        let mut choices = Vec::new();

        loop {
            let page = self
                .store
                .fetch(&base.clone().with_pagination(pagination))
                .await?;
            let next = page.page_info.next_offset;
            choices.extend(page.items.into_iter().filter_map(|record| {
                let value = match record.field_value(value_attribute)? {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => return None,
                    other => other.to_string(),
                };
                Some(Choice::new(value, record.label))
            }));
            match next {
                Some(offset) => pagination = Pagination::new(offset, self.page_size),
                None => break,
            }
        }

        debug!(
            resource_type = %resource_type,
            predicates = predicates.len(),
            candidates = choices.len(),
            "Fetched candidate choices"
        );
        Ok(choices)
    }
}

/// The submitted values of an independent field.
fn settle_independent(field: &FieldDeclaration, data: &FormData) -> Option<Vec<PredicateValue>> {
    let values: Vec<PredicateValue> = distinct_nonblank(data.get(&field.name)?)
        .into_iter()
        .map(|v| to_parent_value(field, v))
        .collect();
    (!values.is_empty()).then_some(values)
}

/// The submitted values of a dependent field that survive in its candidates.
///
/// When nothing survives the field is cleared and restricts nothing.
fn settle_dependent(
    field: &FieldDeclaration,
    data: &FormData,
    candidates: &[Choice],
) -> Option<Vec<PredicateValue>> {
    let values: Vec<PredicateValue> = distinct_nonblank(data.get(&field.name)?)
        .into_iter()
        .filter(|v| candidates.iter().any(|c| c.value == *v))
        .map(|v| to_parent_value(field, v))
        .collect();
    (!values.is_empty()).then_some(values)
}

fn to_parent_value(field: &FieldDeclaration, raw: &str) -> PredicateValue {
    if field.is_null_token(raw) {
        PredicateValue::Null
    } else {
        PredicateValue::text(raw)
    }
}

/// Type-ahead match on a choice's value or label, ignoring case.
fn matches_search(choice: &Choice, search: Option<&str>) -> bool {
    let Some(text) = search else {
        return true;
    };
    let needle = text.to_lowercase();
    choice.value.to_lowercase().contains(&needle) || choice.label.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormBuilder;
    use rackline_persistence::backends::memory::MemoryStore;
    use rackline_persistence::types::ResourceRecord;

    fn store() -> MemoryStore {
        MemoryStore::with_records([
            ResourceRecord::new("region", "region-42", "North"),
            ResourceRecord::new("region", "region-7", "South"),
            ResourceRecord::new("site", "site-a", "Alpha").with_attribute("region_id", "region-42"),
            ResourceRecord::new("site", "site-b", "Bravo").with_attribute("region_id", "region-42"),
            ResourceRecord::new("site", "site-c", "Charlie").with_attribute("region_id", "region-7"),
            ResourceRecord::new("location", "loc-1", "Cage 1").with_attribute("site_id", "site-a"),
            ResourceRecord::new("location", "loc-2", "Cage 2").with_attribute("site_id", "site-c"),
        ])
    }

    fn form() -> FilterForm {
        FormBuilder::new("rack")
            .field(FieldDeclaration::multi_reference("region_id", "region"))
            .field(FieldDeclaration::multi_reference("site_id", "site").depends_on("region_id", "region_id"))
            .field(
                FieldDeclaration::multi_reference("location_id", "location")
                    .depends_on("site_id", "site_id")
                    .null_option("None"),
            )
            .field(FieldDeclaration::text("serial"))
            .build()
            .unwrap()
    }

    fn values(choices: &[Choice]) -> Vec<&str> {
        choices.iter().map(|c| c.value.as_str()).collect()
    }

    #[tokio::test]
    async fn test_parent_restricts_dependent() {
        let (form, store) = (form(), store());
        let resolver = DependentChoiceResolver::new(&form, &store);

        let resolved = resolver
            .resolve(&FormData::new().with("region_id", "region-42"))
            .await
            .unwrap();
        assert_eq!(values(&resolved["site_id"]), vec!["site-a", "site-b"]);
        assert_eq!(values(&resolved["location_id"]), vec!["null", "loc-1", "loc-2"]);
        assert!(!resolved.contains_key("region_id"));
    }

    #[tokio::test]
    async fn test_settled_dependent_restricts_grandchild() {
        let (form, store) = (form(), store());
        let resolver = DependentChoiceResolver::new(&form, &store);

        let data = FormData::new().with("region_id", "region-42").with("site_id", "site-a");
        let resolved = resolver.resolve(&data).await.unwrap();
        assert_eq!(values(&resolved["location_id"]), vec!["null", "loc-1"]);

        // site-c is not a candidate under region-42, so site_id is cleared
        let data = FormData::new().with("region_id", "region-42").with("site_id", "site-c");
        let resolved = resolver.resolve(&data).await.unwrap();
        assert_eq!(values(&resolved["location_id"]), vec!["null", "loc-1", "loc-2"]);
    }

    #[tokio::test]
    async fn test_cleared_parent_equals_omitted() {
        let (form, store) = (form(), store());
        let resolver = DependentChoiceResolver::new(&form, &store);

        let omitted = resolver.resolve(&FormData::new()).await.unwrap();
        let cleared = resolver
            .resolve(&FormData::new().with("region_id", "").with("site_id", " "))
            .await
            .unwrap();
        assert_eq!(omitted, cleared);
        assert_eq!(values(&omitted["site_id"]), vec!["site-a", "site-b", "site-c"]);
    }

    #[tokio::test]
    async fn test_resolve_field_with_search() {
        let (form, store) = (form(), store());
        let resolver = DependentChoiceResolver::new(&form, &store).with_page_size(1);

        let choices = resolver
            .resolve_field("site_id", &FormData::new().with("region_id", "region-42"), Some("brav"))
            .await
            .unwrap();
        assert_eq!(values(&choices), vec!["site-b"]);

        let choices = resolver
            .resolve_field("region_id", &FormData::new(), None)
            .await
            .unwrap();
        assert_eq!(values(&choices), vec!["region-42", "region-7"]);
    }

    #[tokio::test]
    async fn test_null_option_follows_search() {
        let (form, store) = (form(), store());
        let resolver = DependentChoiceResolver::new(&form, &store);

        let choices = resolver
            .resolve_field("location_id", &FormData::new(), Some("cage 2"))
            .await
            .unwrap();
        assert_eq!(values(&choices), vec!["loc-2"]);

        let choices = resolver
            .resolve_field("location_id", &FormData::new(), Some("NONE"))
            .await
            .unwrap();
        assert_eq!(values(&choices), vec!["null"]);
    }

    #[tokio::test]
    async fn test_resolve_field_errors() {
        let (form, store) = (form(), store());
        let resolver = DependentChoiceResolver::new(&form, &store);

        assert!(matches!(
            resolver.resolve_field("serial", &FormData::new(), None).await,
            Err(ResolveError::NotAChoiceField { .. })
        ));
        assert!(matches!(
            resolver.resolve_field("rack_id", &FormData::new(), None).await,
            Err(ResolveError::UnknownField { .. })
        ));
    }

    #[tokio::test]
    async fn test_literal_query_param_always_applies() {
        let store = MemoryStore::with_records([
            ResourceRecord::new("cluster-type", "ct-1", "VMware").with_attribute("kind", "physical"),
            ResourceRecord::new("cluster-type", "ct-2", "Cloud").with_attribute("kind", "virtual"),
        ]);
        let form = FormBuilder::new("cluster")
            .field(FieldDeclaration::multi_reference("type_id", "cluster-type").query_param("kind", "physical"))
            .build()
            .unwrap();
        let resolver = DependentChoiceResolver::new(&form, &store);

        let choices = resolver.resolve_field("type_id", &FormData::new(), None).await.unwrap();
        assert_eq!(values(&choices), vec!["ct-1"]);
    }

    #[tokio::test]
    async fn test_value_attribute() {
        let store = MemoryStore::with_records([
            ResourceRecord::new("tag", "1", "Gold").with_attribute("slug", "gold"),
            ResourceRecord::new("tag", "2", "Unslugged"),
        ]);
        let form = FormBuilder::new("rack")
            .field(FieldDeclaration::multi_reference("tag", "tag").value_attribute("slug"))
            .build()
            .unwrap();
        let resolver = DependentChoiceResolver::new(&form, &store);

        let choices = resolver.resolve_field("tag", &FormData::new(), None).await.unwrap();
        assert_eq!(choices, vec![Choice::new("gold", "Gold")]);
    }
}
