//! Shared utilities for the AlarmDesk crates.
//!
//! Two concerns live here, both free of domain knowledge:
//! - `storage`: the pooled SQLite connection layer used by the
//!   infrastructure repositories
//! - `validation`: field-level input validation (email, phone, zip,
//!   required fields) used by the core services

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod storage;
pub mod validation;

// Re-export commonly used types for convenience
pub use storage::error::{StorageError, StorageResult};
pub use validation::{FieldError, ValidationError};
