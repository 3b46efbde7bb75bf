//! Rackline inventory filter server.

mod fixtures;
mod registry;

use std::sync::Arc;

use clap::Parser;
use rackline_filters::FormRegistry;
use rackline_persistence::backends::memory::MemoryStore;
use rackline_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::info;

use crate::fixtures::Fixtures;
use crate::registry::build_registry;

#[cfg(feature = "sqlite")]
use rackline_persistence::backends::sqlite::SqliteStore;

/// Reads the configured fixtures file, if any.
fn read_fixtures(config: &ServerConfig) -> anyhow::Result<Option<Fixtures>> {
    config.fixtures.as_deref().map(Fixtures::read).transpose()
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        "Starting Rackline"
    );

    let registry = Arc::new(build_registry(config.forms.as_deref())?);

    match backend_mode {
        StorageBackendMode::Memory => start_memory(config, registry).await,
        StorageBackendMode::Sqlite => start_sqlite(config, registry).await,
    }
}

/// Starts the server over an in-memory store.
async fn start_memory(config: ServerConfig, registry: Arc<FormRegistry>) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    if let Some(fixtures) = read_fixtures(&config)? {
        fixtures.load_into(store.as_ref()).await?;
    }

    let app = create_app_with_config(store, registry, config.clone());
    serve(app, &config).await
}

/// Starts the server over a SQLite store.
#[cfg(feature = "sqlite")]
async fn start_sqlite(config: ServerConfig, registry: Arc<FormRegistry>) -> anyhow::Result<()> {
    let db_path = config.database_url.as_deref().unwrap_or(":memory:");
    info!(database = %db_path, "Initializing SQLite store");

    let store = if db_path == ":memory:" {
        SqliteStore::in_memory()?
    } else {
        SqliteStore::open(db_path)?
    };
    store.init_schema()?;
    let store = Arc::new(store);

    if let Some(fixtures) = read_fixtures(&config)? {
        fixtures.load_into(store.as_ref()).await?;
    }

    let app = create_app_with_config(store, registry, config.clone());
    serve(app, &config).await
}

/// Fallback when the sqlite feature is not enabled.
#[cfg(not(feature = "sqlite"))]
async fn start_sqlite(_config: ServerConfig, _registry: Arc<FormRegistry>) -> anyhow::Result<()> {
    anyhow::bail!(
        "The sqlite backend requires the 'sqlite' feature. \
         Build with: cargo build -p rackline --features sqlite"
    )
}
