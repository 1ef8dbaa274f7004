//! SQLite connection pool
//!
//! r2d2-based pooling for the local database file. Each connection gets the
//! configured pragmas applied once, at pool checkout.

use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info, warn};

use super::config::SqlitePoolConfig;
use super::connection::SqliteConnection;
use super::pragmas::apply_connection_pragmas;
use crate::storage::error::{StorageError, StorageResult};

/// SQLite connection pool
///
/// Manages a pool of connections to a single database file using r2d2.
/// WAL mode keeps readers from blocking the writer; the busy timeout covers
/// the remaining contention between pooled connections.
#[derive(Debug, Clone)]
pub struct SqlitePool {
    pool: Pool<SqliteConnectionManager>,
    config: SqlitePoolConfig,
}

impl SqlitePool {
    /// Create a new connection pool for the database at `path`
    ///
    /// # Errors
    /// Returns an error if the database file can't be opened or the pool
    /// can't establish its initial connection.
    pub fn new(path: &Path, config: SqlitePoolConfig) -> StorageResult<Self> {
        info!(db_path = %path.display(), pool_size = config.max_size, "Creating SQLite connection pool");

        let pool_config = config.clone();
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            apply_connection_pragmas(conn, &pool_config)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
            Ok(())
        });

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .map_err(|e| {
                warn!("Failed to create connection pool: {}", e);
                StorageError::Connection(format!("Failed to create pool: {}", e))
            })?;

        // Smoke-test one checkout so configuration errors surface at startup
        pool.get()
            .map_err(|e| StorageError::Connection(format!("Failed to get test connection: {}", e)))?;

        Ok(Self { pool, config })
    }

    /// Acquire a connection from the pool
    pub fn get_connection(&self) -> StorageResult<SqliteConnection> {
        match self.pool.get() {
            Ok(conn) => {
                debug!("Connection acquired");
                Ok(SqliteConnection::new(conn))
            }
            Err(e) => {
                let err_str = e.to_string().to_lowercase();

                if err_str.contains("timeout") {
                    warn!("Connection timeout after {:?}", self.config.connection_timeout);
                    Err(StorageError::Timeout(self.config.connection_timeout.as_secs()))
                } else {
                    warn!("Connection error: {}", e);
                    Err(StorageError::Connection(format!("Failed to get connection: {}", e)))
                }
            }
        }
    }

    /// Maximum number of connections this pool will open
    pub fn max_size(&self) -> u32 {
        self.config.max_size
    }
}
