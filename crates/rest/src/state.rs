//! Shared application state.

use std::sync::Arc;

use rackline_filters::{FormRegistry, ListResolver};
use rackline_persistence::core::ResourceStore;

use crate::config::ServerConfig;

/// State available to every handler: the list resolver (which owns the
/// store and the form registry) and the server configuration.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rackline_filters::catalog;
/// use rackline_persistence::backends::memory::MemoryStore;
/// use rackline_rest::{AppState, ServerConfig};
///
/// let registry = Arc::new(catalog::builtin_registry()?);
/// let state = AppState::new(Arc::new(MemoryStore::new()), registry, ServerConfig::default());
/// ```
pub struct AppState<S: ResourceStore + ?Sized> {
    resolver: Arc<ListResolver<S>>,
    config: Arc<ServerConfig>,
}

// S sits behind Arc and need not be Clone
impl<S: ResourceStore + ?Sized> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: ResourceStore + ?Sized> AppState<S> {
    /// Creates the state from a store, a registry, and configuration.
    pub fn new(store: Arc<S>, registry: Arc<FormRegistry>, config: ServerConfig) -> Self {
        Self {
            resolver: Arc::new(ListResolver::new(store, registry)),
            config: Arc::new(config),
        }
    }

    /// Returns the list resolver.
    pub fn resolver(&self) -> &ListResolver<S> {
        &self.resolver
    }

    /// Returns the form registry.
    pub fn registry(&self) -> &FormRegistry {
        self.resolver.registry()
    }

    /// Returns the store's backend name.
    pub fn backend_name(&self) -> &'static str {
        self.resolver.store().backend_name()
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
