//! Read handler.

use axum::{
    Json,
    extract::{Path, State},
};
use rackline_persistence::core::ResourceStore;
use rackline_persistence::types::ResourceRecord;
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Reads one record by id.
///
/// # HTTP Request
///
/// `GET [base]/api/{resource_type}/{id}`
///
/// # Response
///
/// - `200 OK` - the record
/// - `404 Not Found` - unknown type or id
/// - `412 Precondition Failed` - the id is not unique in the store
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path((resource_type, id)): Path<(String, String)>,
) -> RestResult<Json<ResourceRecord>>
where
    S: ResourceStore + ?Sized + 'static,
{
    debug!(resource_type = %resource_type, id = %id, "Processing read request");

    let record = state.resolver().resolve_one(&resource_type, &id).await?;
    Ok(Json(record))
}
