use rackline_filters::{Choice, FormRegistry};
use rackline_persistence::types::{Page, Pagination, ResourceRecord};
use serde::Serialize;

/// One page of a list, as returned by `GET /api/{type}`.
///
/// ```json
/// {"count": 3, "offset": 0, "limit": 2, "next_offset": 2, "results": [...]}
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ListEnvelope {
    /// Total matching records, if the store reported it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Offset of the first result.
    pub offset: usize,
    /// Page size applied.
    pub limit: Option<usize>,
    /// Offset of the following page, absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<usize>,
    /// The records.
    pub results: Vec<ResourceRecord>,
}

impl ListEnvelope {
    /// Builds the envelope for a resolved page.
    pub fn new(page: Page<ResourceRecord>, pagination: Pagination) -> Self {
        Self {
            count: page.page_info.total,
            offset: page.page_info.offset,
            limit: pagination.limit,
            next_offset: page.page_info.next_offset,
            results: page.items,
        }
    }
}

/// Candidate choices for one field.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceList {
    /// Field the choices belong to.
    pub field: String,
    /// Candidates in display order.
    pub results: Vec<Choice>,
}

/// A registered resource type.
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    /// Resource type name.
    pub name: String,
    /// Whether the type has a filter form.
    pub filterable: bool,
}

/// Every registered resource type, sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct TypeIndex {
    /// The types.
    pub resource_types: Vec<TypeSummary>,
}

impl TypeIndex {
    /// Lists the types of a registry.
    pub fn from_registry(registry: &FormRegistry) -> Self {
        let mut resource_types: Vec<TypeSummary> = registry
            .resource_types()
            .map(|name| TypeSummary {
                name: name.to_string(),
                filterable: registry.form(name).is_some(),
            })
            .collect();
        resource_types.sort_by(|a, b| a.name.cmp(&b.name));
        Self { resource_types }
    }
}
