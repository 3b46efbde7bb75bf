//! # rackline-rest
//!
//! HTTP/JSON surface for Rackline filtered lists and dependent choices.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rackline_filters::catalog;
//! use rackline_persistence::backends::memory::MemoryStore;
//! use rackline_rest::{create_app, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(catalog::builtin_registry()?);
//!     let app = create_app(Arc::new(MemoryStore::new()), registry);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | list | GET | `/api/{type}?filters&offset=&limit=&ordering=` |
//! | read | GET | `/api/{type}/{id}` |
//! | form | GET | `/api/{type}/_form` |
//! | choices | GET | `/api/{type}/_choices/{field}?parents&q=` |
//! | types | GET | `/api/_types` |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! ## Error Handling
//!
//! Errors are JSON bodies `{"error": {"code", "detail", "fields"?}}`:
//!
//! | HTTP Status | Code | Description |
//! |-------------|------|-------------|
//! | 400 | invalid | Invalid filters (with `fields`), paging, or ordering |
//! | 400 | not-supported | Choices requested for a field without choices |
//! | 404 | not-found | Unknown type, field, or record |
//! | 412 | multiple-matches | A single-record lookup matched several records |
//! | 500 | exception | Store failure |
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and their JSON rendering
//! - [`state`] - Application state (resolver, configuration)
//! - [`extractors`] - Query string extractors
//! - [`handlers`] - HTTP request handlers
//! - [`responses`] - Response bodies
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use rackline_filters::FormRegistry;
use rackline_persistence::core::ResourceStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(store: Arc<S>, registry: Arc<FormRegistry>) -> Router
where
    S: ResourceStore + ?Sized + 'static,
{
    create_app_with_config(store, registry, ServerConfig::default())
}

/// Creates the application with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use rackline_rest::{create_app_with_config, ServerConfig};
///
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: false,
///     ..Default::default()
/// };
/// let app = create_app_with_config(store, registry, config);
/// ```
pub fn create_app_with_config<S>(store: Arc<S>, registry: Arc<FormRegistry>, config: ServerConfig) -> Router
where
    S: ResourceStore + ?Sized + 'static,
{
    info!(
        backend = store.backend_name(),
        resource_types = registry.len(),
        "Creating HTTP API"
    );

    let state = AppState::new(store, registry, config.clone());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Call once at startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rackline={level},rackline_rest={level},rackline_filters={level},rackline_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
