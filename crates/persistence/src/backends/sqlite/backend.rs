//! SQLite backend implementation.

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ResourceLoader, ResourceStore};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Page, Predicate, ResourceRecord, StoreQuery, paginate};

use super::query_builder::{SqlFragment, build_count, build_select};
use super::schema;

/// SQLite backend for resource records.
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
    config: SqliteStoreConfig,
    is_memory: bool,
}

impl Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("config", &self.config)
            .field("is_memory", &self.is_memory)
            .finish_non_exhaustive()
    }
}

/// Configuration for the SQLite backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteStoreConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connection_timeout_ms")]
    pub connection_timeout_ms: u64,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,

    /// Enable WAL mode for better concurrency.
    #[serde(default = "default_true")]
    pub enable_wal: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout_ms() -> u64 {
    30000
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

fn default_true() -> bool {
    true
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout_ms: default_connection_timeout_ms(),
            busy_timeout_ms: default_busy_timeout_ms(),
            enable_wal: true,
        }
    }
}

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

/// Registers the SQL functions the query builder relies on.
///
/// `casefold(x)` lowercases text with full Unicode case mapping, matching
/// the in-memory matcher. Numbers fold to their text form and anything else
/// to NULL.
pub(crate) fn register_functions(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let folded = match ctx.get_raw(0) {
                ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).to_lowercase()),
                ValueRef::Integer(i) => Some(i.to_string()),
                ValueRef::Real(f) => Some(f.to_string()),
                ValueRef::Null | ValueRef::Blob(_) => None,
            };
            Ok(folded)
        },
    )
}

impl SqliteStore {
    /// Creates a new in-memory SQLite store.
    pub fn in_memory() -> StorageResult<Self> {
        Self::with_config(":memory:", SqliteStoreConfig::default())
    }

    /// Opens or creates a file-based SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::with_config(path, SqliteStoreConfig::default())
    }

    /// Creates a store with custom configuration.
    ///
    /// An in-memory database lives inside a single connection, so the pool is
    /// capped at one connection in that mode.
    pub fn with_config<P: AsRef<Path>>(path: P, config: SqliteStoreConfig) -> StorageResult<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let is_memory = path_str == ":memory:";

        let (manager, max_size) = if is_memory {
            (SqliteConnectionManager::memory(), 1)
        } else {
            (
                SqliteConnectionManager::file(path.as_ref()),
                config.max_connections.max(1),
            )
        };

        let manager = manager.with_init(register_functions);

        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(config.min_connections.min(max_size)))
            .connection_timeout(std::time::Duration::from_millis(
                config.connection_timeout_ms,
            ))
            .build(manager)
            .map_err(|e| {
                StorageError::Backend(BackendError::ConnectionFailed {
                    backend_name: "sqlite".to_string(),
                    message: e.to_string(),
                })
            })?;

        let store = Self {
            pool,
            config,
            is_memory,
        };
        store.configure_connection()?;

        Ok(store)
    }

    /// Initialize the database schema.
    pub fn init_schema(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;
        schema::initialize_schema(&conn)
    }

    /// Get a connection from the pool.
    pub(crate) fn get_connection(
        &self,
    ) -> StorageResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| {
            StorageError::Backend(BackendError::ConnectionFailed {
                backend_name: "sqlite".to_string(),
                message: e.to_string(),
            })
        })
    }

    /// Configure connection settings.
    fn configure_connection(&self) -> StorageResult<()> {
        let conn = self.get_connection()?;

        conn.busy_timeout(std::time::Duration::from_millis(
            self.config.busy_timeout_ms as u64,
        ))
        .map_err(|e| internal_error(format!("Failed to set busy timeout: {}", e)))?;

        if self.config.enable_wal && !self.is_memory {
            conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
                .map_err(|e| internal_error(format!("Failed to enable WAL mode: {}", e)))?;
        }

        Ok(())
    }

    /// Returns whether this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.is_memory
    }

    /// Returns the store configuration.
    pub fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Inserts or replaces records in one transaction.
    pub fn insert_records(&self, records: &[ResourceRecord]) -> StorageResult<usize> {
        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO resources (resource_type, id, label, attributes)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in records {
                let attributes = serde_json::to_string(&record.attributes)?;
                stmt.execute(params![
                    record.resource_type,
                    record.id,
                    record.label,
                    attributes
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    fn query_records(&self, frag: &SqlFragment) -> StorageResult<Vec<ResourceRecord>> {
        let conn = self.get_connection()?;
        let mut stmt = conn
            .prepare(&frag.sql)
            .map_err(|e| internal_error(format!("Failed to prepare query: {}", e)))?;

        let bound: Vec<Box<dyn rusqlite::ToSql>> = frag.params.iter().map(|p| p.to_sql()).collect();
        let param_refs: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let resource_type: String = row.get(0)?;
                let id: String = row.get(1)?;
                let label: String = row.get(2)?;
                let attributes: String = row.get(3)?;
                Ok((resource_type, id, label, attributes))
            })
            .map_err(|e| internal_error(format!("Failed to execute query: {}", e)))?;

        let raw_rows = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| internal_error(format!("Failed to read row: {}", e)))?;

        raw_rows
            .into_iter()
            .map(|(resource_type, id, label, attributes)| {
                Ok(ResourceRecord {
                    resource_type,
                    id,
                    label,
                    attributes: serde_json::from_str(&attributes)?,
                })
            })
            .collect()
    }

    fn query_count(&self, frag: &SqlFragment) -> StorageResult<usize> {
        let conn = self.get_connection()?;
        let bound: Vec<Box<dyn rusqlite::ToSql>> = frag.params.iter().map(|p| p.to_sql()).collect();
        let param_refs: Vec<&dyn rusqlite::ToSql> = bound.iter().map(|p| p.as_ref()).collect();

        let count: i64 = conn
            .query_row(&frag.sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| internal_error(format!("Failed to count: {}", e)))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl ResourceStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch(&self, query: &StoreQuery) -> StorageResult<Page<ResourceRecord>> {
        query.check()?;

        let frag = build_select(query);
        debug!(resource_type = %query.resource_type, sql = %frag.sql, "Executing SQLite query");
        let window = self.query_records(&frag)?;

        let total = if query.include_total {
            Some(self.query_count(&build_count(&query.resource_type, &query.predicates))?)
        } else {
            None
        };

        Ok(paginate(window, query.pagination, total))
    }

    async fn count(&self, resource_type: &str, predicates: &[Predicate]) -> StorageResult<usize> {
        for predicate in predicates {
            predicate.check()?;
        }
        self.query_count(&build_count(resource_type, predicates))
    }

    async fn resource_types(&self) -> StorageResult<Vec<String>> {
        let conn = self.get_connection()?;
        let mut stmt =
            conn.prepare("SELECT DISTINCT resource_type FROM resources ORDER BY resource_type")?;
        let types = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(types)
    }
}

#[async_trait]
impl ResourceLoader for SqliteStore {
    async fn load(&self, records: Vec<ResourceRecord>) -> StorageResult<usize> {
        self.insert_records(&records)
    }
}
