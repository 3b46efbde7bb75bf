//! Health check endpoint handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rackline_persistence::core::ResourceStore;
use tracing::{debug, warn};

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: ResourceStore + ?Sized + 'static,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.backend_name(),
        "resource_types": state.registry().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}

/// Liveness probe.
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: asks the store for its resource types.
///
/// # Response
///
/// - `200 OK` - the store answered
/// - `503 Service Unavailable` - the store failed
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: ResourceStore + ?Sized + 'static,
{
    debug!("Processing readiness check request");

    match state.resolver().store().resource_types().await {
        Ok(types) => {
            let response = serde_json::json!({
                "status": "ready",
                "backend": state.backend_name(),
                "checks": {
                    "storage": "ok",
                    "stored_types": types.len()
                }
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            let response = serde_json::json!({
                "status": "unavailable",
                "backend": state.backend_name(),
                "checks": {
                    "storage": e.to_string()
                }
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
