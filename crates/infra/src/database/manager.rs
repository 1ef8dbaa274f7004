//! Database connection manager backed by the shared SQLite pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_common::storage::StorageError;
use alarmdesk_domain::{AlarmDeskError, DatabaseConfig, Result};
use rusqlite::params;
use tracing::info;

use super::sqlite_pool::{create_sqlite_pool, SqlitePool, SqlitePoolConfig};
use crate::errors::InfraError;

const SCHEMA_VERSION: i32 = 1;
const SCHEMA_SQL: &str = include_str!("schema.sql");
const SEED_SQL: &str = include_str!("seed.sql");

/// Database manager that wraps an [`SqlitePool`].
pub struct DbManager {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbManager {
    /// Create a new manager with the given pool size.
    pub fn new<P: AsRef<Path>>(db_path: P, pool_size: u32) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();

        let config = SqlitePoolConfig::with_max_size(pool_size);
        let pool = create_sqlite_pool(&path, config)?;

        info!(
            db_path = %path.display(),
            max_connections = pool.max_size(),
            "sqlite pool initialised"
        );

        Ok(Self { pool, path })
    }

    /// Create a manager from the application's database configuration.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.pool_size)
    }

    /// Borrow the underlying SQLite pool.
    pub fn pool(&self) -> &Arc<SqlitePool> {
        &self.pool
    }

    /// Acquire a connection from the pool.
    pub fn get_connection(&self) -> Result<SqliteConnection> {
        self.pool.get_connection().map_err(map_storage_error)
    }

    /// Ensure the full schema exists on the current database.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        create_schema(&conn)?;
        Ok(())
    }

    /// Insert the stock reference data (customer types, statuses, ...).
    ///
    /// Idempotent; safe to run on every startup after [`run_migrations`].
    ///
    /// [`run_migrations`]: Self::run_migrations
    pub fn seed_reference_data(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.inner().execute_batch(SEED_SQL).map_err(map_sql_error)?;
        Ok(())
    }

    /// Return the configured database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Perform a health check to verify database connectivity.
    ///
    /// Acquires a connection from the pool and executes a trivial query to
    /// verify the database is accessible and responding.
    pub fn health_check(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", &[], |row| row.get::<_, i32>(0))
            .map_err(map_storage_error)?;
        Ok(())
    }
}

fn create_schema(conn: &SqliteConnection) -> Result<()> {
    conn.inner().execute_batch(SCHEMA_SQL).map_err(map_sql_error)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?, CAST(strftime('%s','now') AS INTEGER))",
        params![SCHEMA_VERSION],
    )
    .map_err(map_storage_error)?;
    Ok(())
}

fn map_sql_error(err: rusqlite::Error) -> AlarmDeskError {
    AlarmDeskError::from(InfraError::from(err))
}

fn map_storage_error(err: StorageError) -> AlarmDeskError {
    AlarmDeskError::from(InfraError::from(err))
}
