//! Generic list resolution.
//!
//! A resource type's filter form is applied to its base collection: the
//! caller's raw filters are validated, turned into predicates, and executed
//! against the store as one page.

use std::collections::BTreeMap;
use std::sync::Arc;

use rackline_persistence::core::ResourceStore;
use rackline_persistence::types::{Page, Pagination, Predicate, PredicateValue, ResourceRecord, SortKey, StoreQuery};
use tracing::{debug, warn};

use crate::choices::{DEFAULT_CHOICE_PAGE_SIZE, DependentChoiceResolver};
use crate::data::FormData;
use crate::error::{ResolveError, ResolveResult};
use crate::field::Choice;
use crate::form::FilterForm;
use crate::predicates::build_predicates;
use crate::registry::FormRegistry;

/// Caller arguments of a list request.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    /// Raw filter values.
    pub filters: FormData,
    /// Requested ordering; empty means the type's default.
    pub ordering: Vec<SortKey>,
    /// Requested page.
    pub pagination: Pagination,
}

impl ListArgs {
    /// Creates arguments with the given filters and default paging.
    pub fn new(filters: FormData) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    /// Sets the ordering.
    pub fn with_ordering(mut self, ordering: Vec<SortKey>) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sets the page.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Parses an `ordering` argument such as `-created,label`.
pub fn parse_ordering(raw: &str) -> ResolveResult<Vec<SortKey>> {
    SortKey::parse_list(raw).map_err(ResolveError::InvalidOrdering)
}

/// Validates filters against a form and builds predicates.
///
/// Any field error fails the whole request; a partially valid filter is
/// never applied.
pub fn filter_predicates(form: &FilterForm, filters: &FormData) -> ResolveResult<Vec<Predicate>> {
    match form.validate(filters) {
        Ok(cleaned) => Ok(build_predicates(form, &cleaned)),
        Err(errors) => {
            warn!(
                resource_type = %form.resource_type(),
                fields = errors.len(),
                "Rejected invalid filters"
            );
            Err(ResolveError::InvalidFilters(errors))
        }
    }
}

/// Resolves one page of a resource type's collection.
///
/// Without a form, filters are ignored and the default-ordered collection is
/// returned.
pub async fn resolve_list_with<S: ResourceStore + ?Sized>(
    store: &S,
    resource_type: &str,
    form: Option<&FilterForm>,
    args: &ListArgs,
) -> ResolveResult<Page<ResourceRecord>> {
    let predicates = match form {
        Some(form) => filter_predicates(form, &args.filters)?,
        None => Vec::new(),
    };

    let ordering = if !args.ordering.is_empty() {
        args.ordering.clone()
    } else if let Some(form) = form {
        form.ordering().to_vec()
    } else {
        Vec::new()
    };

    debug!(
        resource_type = %resource_type,
        predicates = predicates.len(),
        offset = args.pagination.offset,
        "Resolving list"
    );

    let query = StoreQuery::new(resource_type)
        .with_predicates(predicates)
        .with_ordering(ordering)
        .with_pagination(args.pagination)
        .with_total();
    Ok(store.fetch(&query).await?)
}

/// Resolves lists, single records, and choices for registered types.
pub struct ListResolver<S: ResourceStore + ?Sized> {
    store: Arc<S>,
    registry: Arc<FormRegistry>,
    choice_page_size: usize,
}

impl<S: ResourceStore + ?Sized> Clone for ListResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            choice_page_size: self.choice_page_size,
        }
    }
}

impl<S: ResourceStore + ?Sized> ListResolver<S> {
    /// Creates a resolver.
    pub fn new(store: Arc<S>, registry: Arc<FormRegistry>) -> Self {
        Self {
            store,
            registry,
            choice_page_size: DEFAULT_CHOICE_PAGE_SIZE,
        }
    }

    /// Sets the page size used when draining candidate queries.
    pub fn with_choice_page_size(mut self, page_size: usize) -> Self {
        self.choice_page_size = page_size;
        self
    }

    /// Returns the registry.
    pub fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn check_registered(&self, resource_type: &str) -> ResolveResult<Option<&FilterForm>> {
        if !self.registry.contains(resource_type) {
            return Err(ResolveError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            });
        }
        Ok(self.registry.form(resource_type).map(Arc::as_ref))
    }

    fn form_for(&self, resource_type: &str) -> ResolveResult<&FilterForm> {
        self.check_registered(resource_type)?
            .ok_or_else(|| ResolveError::UnknownResourceType {
                resource_type: resource_type.to_string(),
            })
    }

    /// Resolves one filtered, ordered page of a registered type.
    pub async fn resolve_list(&self, resource_type: &str, args: &ListArgs) -> ResolveResult<Page<ResourceRecord>> {
        let form = self.check_registered(resource_type)?;
        resolve_list_with(self.store.as_ref(), resource_type, form, args).await
    }

    /// Resolves the record with the given id.
    pub async fn resolve_one(&self, resource_type: &str, id: &str) -> ResolveResult<ResourceRecord> {
        self.resolve_one_by(resource_type, "id", id).await
    }

    /// Resolves the record whose `attribute` equals `value`, for attributes
    /// expected to be unique (e.g. `slug`).
    pub async fn resolve_one_by(
        &self,
        resource_type: &str,
        attribute: &str,
        value: &str,
    ) -> ResolveResult<ResourceRecord> {
        self.check_registered(resource_type)?;
        let predicates = vec![Predicate::exact(attribute, PredicateValue::text(value))];
        self.single(resource_type, predicates, format!("{}={}", attribute, value))
            .await
    }

    /// Resolves the only record matching the filters.
    ///
    /// Zero matches fail with `NotFound`, more than one with
    /// `AmbiguousResult`; neither is coerced.
    pub async fn resolve_unique(&self, resource_type: &str, filters: &FormData) -> ResolveResult<ResourceRecord> {
        let predicates = match self.check_registered(resource_type)? {
            Some(form) => filter_predicates(form, filters)?,
            None => Vec::new(),
        };
        let criteria = describe(filters);
        self.single(resource_type, predicates, criteria).await
    }

    async fn single(
        &self,
        resource_type: &str,
        predicates: Vec<Predicate>,
        criteria: String,
    ) -> ResolveResult<ResourceRecord> {
        let query = StoreQuery::new(resource_type)
            .with_predicates(predicates)
            .with_pagination(Pagination::new(0, 2));
        let mut page = self.store.fetch(&query).await?;

        match page.items.len() {
            0 => Err(ResolveError::NotFound {
                resource_type: resource_type.to_string(),
                criteria,
            }),
            1 if !page.page_info.has_next() => Ok(page.items.remove(0)),
            _ => Err(ResolveError::AmbiguousResult {
                resource_type: resource_type.to_string(),
                criteria,
            }),
        }
    }

    /// Resolves the candidates of one field given the current parent values.
    pub async fn choices(
        &self,
        resource_type: &str,
        field: &str,
        values: &FormData,
        search: Option<&str>,
    ) -> ResolveResult<Vec<Choice>> {
        let form = self.form_for(resource_type)?;
        DependentChoiceResolver::new(form, self.store.as_ref())
            .with_page_size(self.choice_page_size)
            .resolve_field(field, values, search)
            .await
    }

    /// Resolves the candidates of every dependent field of a form.
    pub async fn dependent_choices(
        &self,
        resource_type: &str,
        values: &FormData,
    ) -> ResolveResult<BTreeMap<String, Vec<Choice>>> {
        let form = self.form_for(resource_type)?;
        DependentChoiceResolver::new(form, self.store.as_ref())
            .with_page_size(self.choice_page_size)
            .resolve(values)
            .await
    }
}

fn describe(filters: &FormData) -> String {
    let parts: Vec<String> = filters
        .iter()
        .map(|(name, values)| format!("{}={}", name, values.join(",")))
        .collect();
    if parts.is_empty() {
        "no filters".to_string()
    } else {
        parts.join("&")
    }
}
