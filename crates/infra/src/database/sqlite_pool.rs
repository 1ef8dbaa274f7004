//! SQLite pool helpers
//!
//! Thin wrapper around the shared SQLite connection pool that converts
//! storage errors into the domain error type used by infrastructure code.

use std::path::Path;
use std::sync::Arc;

pub use alarmdesk_common::storage::sqlite::{SqlitePool, SqlitePoolConfig};
use alarmdesk_common::storage::StorageError;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult};

use crate::errors::InfraError;

/// Convenience helper for creating an `Arc<SqlitePool>` using domain error
/// semantics.
pub fn create_sqlite_pool<P: AsRef<Path>>(
    path: P,
    config: SqlitePoolConfig,
) -> DomainResult<Arc<SqlitePool>> {
    SqlitePool::new(path.as_ref(), config).map(Arc::new).map_err(map_storage_error)
}

fn map_storage_error(err: StorageError) -> AlarmDeskError {
    AlarmDeskError::from(InfraError::from(err))
}
