//! Pooled SQLite connections
//!
//! r2d2-based pooling over rusqlite with per-connection pragmas applied at
//! checkout time.

mod config;
mod connection;
mod pool;
mod pragmas;

pub use config::SqlitePoolConfig;
pub use connection::{SqliteConnection, SqliteStatement};
pub use pool::SqlitePool;
pub use pragmas::apply_connection_pragmas;
