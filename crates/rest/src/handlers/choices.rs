//! Dynamic choice handler.

use axum::{
    Json,
    extract::{Path, State},
};
use rackline_persistence::core::ResourceStore;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::FilterQuery;
use crate::responses::ChoiceList;
use crate::state::AppState;

/// Query parameter carrying the search text.
pub const SEARCH_PARAM: &str = "q";

/// Returns the candidate choices of one field, restricted by the current
/// values of its parents.
///
/// # HTTP Request
///
/// `GET [base]/api/{resource_type}/_choices/{field}?{parent values}&q=`
///
/// # Response
///
/// - `200 OK` - a [`ChoiceList`]
/// - `400 Bad Request` - the field offers no choices
/// - `404 Not Found` - unknown type or field
pub async fn choices_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, field)): Path<(String, String)>,
    FilterQuery(mut values): FilterQuery,
) -> RestResult<Json<ChoiceList>>
where
    S: ResourceStore + ?Sized + 'static,
{
    let search = values
        .remove(SEARCH_PARAM)
        .and_then(|mut q| q.pop())
        .filter(|q| !q.trim().is_empty());

    debug!(
        resource_type = %resource_type,
        field = %field,
        search = ?search,
        "Processing choices request"
    );

    let results = state
        .resolver()
        .choices(&resource_type, &field, &values, search.as_deref())
        .await?;

    Ok(Json(ChoiceList { field, results }))
}
