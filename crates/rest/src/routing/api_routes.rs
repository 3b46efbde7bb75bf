//! API route configuration.

use axum::{Router, routing::get};
use rackline_persistence::core::ResourceStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all routes.
///
/// # Routes
///
/// ## Probes
/// - `GET /health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
///
/// ## Type-level
/// - `GET /api/_types` - Registered resource types
/// - `GET /api/{type}` - Filtered list
/// - `GET /api/{type}/_form` - Form description
/// - `GET /api/{type}/_choices/{field}` - Dependent choices
///
/// ## Instance-level
/// - `GET /api/{type}/{id}` - Read
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: ResourceStore + ?Sized + 'static,
{
    Router::new()
        // Probes
        .route("/health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::health::liveness_handler))
        .route("/_readiness", get(handlers::health::readiness_handler::<S>))
        // Type-level routes
        .route("/api/_types", get(handlers::types_handler::<S>))
        .route("/api/{resource_type}", get(handlers::list_handler::<S>))
        .route("/api/{resource_type}/_form", get(handlers::form_handler::<S>))
        .route(
            "/api/{resource_type}/_choices/{field}",
            get(handlers::choices_handler::<S>),
        )
        // Instance-level routes
        .route("/api/{resource_type}/{id}", get(handlers::read_handler::<S>))
        .with_state(state)
}
