//! Resource type index handler.

use axum::{Json, extract::State};
use rackline_persistence::core::ResourceStore;

use crate::responses::TypeIndex;
use crate::state::AppState;

/// Lists the registered resource types and whether each has a filter form.
///
/// `GET [base]/api/_types`
pub async fn types_handler<S>(State(state): State<AppState<S>>) -> Json<TypeIndex>
where
    S: ResourceStore + ?Sized + 'static,
{
    Json(TypeIndex::from_registry(state.registry()))
}
