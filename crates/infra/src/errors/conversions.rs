//! Conversions from external infrastructure errors into domain errors.

use alarmdesk_common::storage::StorageError;
use alarmdesk_domain::AlarmDeskError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AlarmDeskError);

impl From<InfraError> for AlarmDeskError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AlarmDeskError> for InfraError {
    fn from(value: AlarmDeskError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDomainError {
    fn into_domain(self) -> AlarmDeskError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AlarmDeskError */
/* -------------------------------------------------------------------------- */

impl IntoDomainError for SqlError {
    fn into_domain(self) -> AlarmDeskError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        AlarmDeskError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        AlarmDeskError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        AlarmDeskError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        AlarmDeskError::Database("foreign key constraint violation".into())
                    }
                    _ => AlarmDeskError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => AlarmDeskError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                AlarmDeskError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                AlarmDeskError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                AlarmDeskError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                AlarmDeskError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => AlarmDeskError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => AlarmDeskError::Database("invalid SQL query".into()),
            other => AlarmDeskError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError → AlarmDeskError */
/* -------------------------------------------------------------------------- */

impl IntoDomainError for StorageError {
    fn into_domain(self) -> AlarmDeskError {
        match self {
            // Unwrap raw sqlite errors so constraint/no-rows classification
            // still applies after pooling wrapped them.
            StorageError::Rusqlite(err) => err.into_domain(),
            StorageError::Connection(msg) => AlarmDeskError::Database(msg),
            StorageError::Query(msg) => AlarmDeskError::Database(msg),
            StorageError::DatabaseError(msg) => AlarmDeskError::Database(msg),
            StorageError::Migration(msg) => {
                AlarmDeskError::Database(format!("Migration error: {msg}"))
            }
            StorageError::PoolExhausted => {
                AlarmDeskError::Database("connection pool exhausted".into())
            }
            StorageError::Timeout(secs) => {
                AlarmDeskError::Database(format!("connection timeout after {secs}s"))
            }
            StorageError::InvalidConfig(msg) => AlarmDeskError::Config(msg),
            other => AlarmDeskError::Database(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_domain())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use rusqlite::ffi::{Error as FfiError, ErrorCode};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: AlarmDeskError = InfraError::from(err).into();
        match mapped {
            AlarmDeskError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn unique_violation_is_classified() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 2067 },
            Some("UNIQUE constraint failed: work_orders.number".into()),
        );

        let mapped: AlarmDeskError = InfraError::from(err).into();
        match mapped {
            AlarmDeskError::Database(msg) => assert!(msg.contains("unique")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: AlarmDeskError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, AlarmDeskError::NotFound(_)));
    }

    #[test]
    fn storage_wrapper_unwraps_inner_sqlite_error() {
        let storage = StorageError::Rusqlite(SqlError::QueryReturnedNoRows);
        let mapped: AlarmDeskError = InfraError::from(storage).into();
        assert!(matches!(mapped, AlarmDeskError::NotFound(_)));
    }

    #[test]
    fn invalid_config_maps_to_config_error() {
        let storage = StorageError::InvalidConfig("bad pool size".into());
        let mapped: AlarmDeskError = InfraError::from(storage).into();
        assert!(matches!(mapped, AlarmDeskError::Config(_)));
    }
}
