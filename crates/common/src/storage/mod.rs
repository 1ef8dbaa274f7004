//! Storage primitives for the local SQLite database
//!
//! Generic connection-pool infrastructure with no knowledge of the schema;
//! the infrastructure crate layers repositories on top of it.

pub mod error;
pub mod sqlite;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use sqlite::{apply_connection_pragmas, SqliteConnection, SqlitePool, SqlitePoolConfig};
