//! List handler.

use axum::{
    Json,
    extract::{Path, State},
};
use rackline_filters::ListArgs;
use rackline_persistence::core::ResourceStore;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{FilterQuery, ListParams};
use crate::responses::ListEnvelope;
use crate::state::AppState;

/// Resolves a filtered, ordered page of a resource type.
///
/// # HTTP Request
///
/// `GET [base]/api/{resource_type}?{filters}&offset=&limit=&ordering=`
///
/// Every query parameter other than `offset`, `limit` and `ordering` is a
/// filter value. Types without a form ignore filters.
///
/// # Response
///
/// - `200 OK` - a [`ListEnvelope`]
/// - `400 Bad Request` - invalid filters, paging, or ordering
/// - `404 Not Found` - unknown resource type
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
    FilterQuery(mut filters): FilterQuery,
) -> RestResult<Json<ListEnvelope>>
where
    S: ResourceStore + ?Sized + 'static,
{
    let params = ListParams::take_from(&mut filters)?;
    let pagination = params.pagination(state.config());

    debug!(
        resource_type = %resource_type,
        filters = filters.iter().count(),
        "Processing list request"
    );

    let args = ListArgs::new(filters)
        .with_ordering(params.ordering)
        .with_pagination(pagination);
    let page = state.resolver().resolve_list(&resource_type, &args).await?;

    Ok(Json(ListEnvelope::new(page, pagination)))
}
