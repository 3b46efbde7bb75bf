//! Form description handler.

use axum::{
    Json,
    extract::{Path, State},
};
use rackline_filters::FormDescription;
use rackline_persistence::core::ResourceStore;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Describes the filter form of a resource type: fieldsets, fields,
/// dependencies, and accepted arguments.
///
/// `GET [base]/api/{resource_type}/_form`
///
/// Unknown types and types listed without a form answer `404 Not Found`.
pub async fn form_handler<S>(
    State(state): State<AppState<S>>,
    Path(resource_type): Path<String>,
) -> RestResult<Json<FormDescription>>
where
    S: ResourceStore + ?Sized + 'static,
{
    let registry = state.registry();
    match registry.form(&resource_type) {
        Some(form) => Ok(Json(form.describe())),
        None if registry.contains(&resource_type) => Err(RestError::NotFound {
            message: format!("{} has no filter form", resource_type),
        }),
        None => Err(RestError::NotFound {
            message: format!("unknown resource type: {}", resource_type),
        }),
    }
}
