//! Server configuration for the Rackline HTTP API.
//!
//! Values come from command line arguments, falling back to environment
//! variables and then to the defaults below.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RACKLINE_PORT` | 8080 | Server port |
//! | `RACKLINE_HOST` | 127.0.0.1 | Host to bind |
//! | `RACKLINE_LOG_LEVEL` | info | Log level |
//! | `RACKLINE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `RACKLINE_ENABLE_CORS` | true | Enable CORS |
//! | `RACKLINE_CORS_ORIGINS` | * | Allowed origins |
//! | `RACKLINE_CORS_METHODS` | GET,OPTIONS | Allowed methods |
//! | `RACKLINE_CORS_HEADERS` | Content-Type,Accept | Allowed headers |
//! | `RACKLINE_STORAGE_BACKEND` | memory | `memory` or `sqlite` |
//! | `RACKLINE_DATABASE_URL` | (none) | SQLite path, `:memory:` if unset |
//! | `RACKLINE_FIXTURES` | (none) | JSON file of records and tags to load |
//! | `RACKLINE_FORMS` | (none) | JSON file of extra form specs |
//! | `RACKLINE_DEFAULT_PAGE_SIZE` | 50 | Page size when `limit` is absent |
//! | `RACKLINE_MAX_PAGE_SIZE` | 1000 | Upper bound for `limit` |
//!
//! # Example
//!
//! ```rust
//! use rackline_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackendMode {
    /// Records held in process memory.
    #[default]
    Memory,
    /// Records held in a SQLite database.
    Sqlite,
}

/// An unrecognised storage backend name.
#[derive(Debug, Error)]
#[error("unknown storage backend '{0}' (expected 'memory' or 'sqlite')")]
pub struct UnknownBackendError(String);

impl FromStr for StorageBackendMode {
    type Err = UnknownBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(UnknownBackendError(other.to_string())),
        }
    }
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Server configuration for the Rackline HTTP API.
///
/// Build it with [`ServerConfig::parse`] (arguments and environment),
/// [`ServerConfig::from_env`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "rackline")]
#[command(about = "Rackline inventory filter server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "RACKLINE_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "RACKLINE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "RACKLINE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "RACKLINE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "RACKLINE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "RACKLINE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "RACKLINE_CORS_METHODS", default_value = "GET,OPTIONS")]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "RACKLINE_CORS_HEADERS", default_value = "Content-Type,Accept")]
    pub cors_headers: String,

    /// Storage backend (memory or sqlite).
    #[arg(long, env = "RACKLINE_STORAGE_BACKEND", default_value = "memory")]
    pub storage_backend: String,

    /// SQLite database path.
    #[arg(long, env = "RACKLINE_DATABASE_URL")]
    pub database_url: Option<String>,

    /// JSON file of records and tags loaded at startup.
    #[arg(long, env = "RACKLINE_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// JSON file of additional filter form specs.
    #[arg(long, env = "RACKLINE_FORMS")]
    pub forms: Option<PathBuf>,

    /// Page size used when a list request has no `limit`.
    #[arg(long, env = "RACKLINE_DEFAULT_PAGE_SIZE", default_value = "50")]
    pub default_page_size: usize,

    /// Largest accepted `limit`.
    #[arg(long, env = "RACKLINE_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept".to_string(),
            storage_backend: "memory".to_string(),
            database_url: None,
            fixtures: None,
            forms: None,
            default_page_size: 50,
            max_page_size: 1000,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration from environment variables, ignoring command
    /// line arguments that do not parse.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the parsed storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, UnknownBackendError> {
        self.storage_backend.parse()
    }

    /// Clamps a requested page size to the configured bounds.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            ..Default::default()
        }
    }
}
