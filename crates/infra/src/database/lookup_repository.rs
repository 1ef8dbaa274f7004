//! Table-driven repository for the homogeneous lookup tables
//!
//! The seven name+description lookup tables share one implementation: a
//! static descriptor per [`LookupKind`] names the table and the dependent
//! (table, column) pairs its referential guard has to count. Table and
//! column names come only from these descriptors, never from callers, so
//! the formatted SQL stays injection-free.

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::settings::ports::LookupRepository as LookupRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, LookupEntry, LookupKind, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

/// An active-row foreign-key reference the delete guard must respect
struct Dependent {
    table: &'static str,
    column: &'static str,
}

/// Physical mapping of one lookup kind
struct LookupTable {
    table: &'static str,
    dependents: &'static [Dependent],
}

static CUSTOMER_TYPES: LookupTable = LookupTable {
    table: "customer_types",
    dependents: &[Dependent { table: "customers", column: "customer_type_id" }],
};
static CONTACT_TYPES: LookupTable = LookupTable {
    table: "contact_types",
    dependents: &[Dependent { table: "contacts", column: "contact_type_id" }],
};
static MONITORING_TYPES: LookupTable = LookupTable {
    table: "monitoring_types",
    dependents: &[Dependent { table: "security_systems", column: "monitoring_type_id" }],
};
static DEVICE_TYPES: LookupTable = LookupTable {
    table: "device_types",
    dependents: &[Dependent { table: "zones", column: "device_type_id" }],
};
static COMMUNICATOR_TYPES: LookupTable = LookupTable {
    table: "communicator_types",
    dependents: &[Dependent { table: "communicators", column: "communicator_type_id" }],
};
static WORK_ORDER_TYPES: LookupTable = LookupTable {
    table: "work_order_types",
    dependents: &[Dependent { table: "work_orders", column: "work_order_type_id" }],
};
static WORK_ORDER_CATEGORIES: LookupTable = LookupTable {
    table: "work_order_categories",
    dependents: &[Dependent { table: "work_orders", column: "category_id" }],
};

fn descriptor(kind: LookupKind) -> &'static LookupTable {
    match kind {
        LookupKind::CustomerType => &CUSTOMER_TYPES,
        LookupKind::ContactType => &CONTACT_TYPES,
        LookupKind::MonitoringType => &MONITORING_TYPES,
        LookupKind::DeviceType => &DEVICE_TYPES,
        LookupKind::CommunicatorType => &COMMUNICATOR_TYPES,
        LookupKind::WorkOrderType => &WORK_ORDER_TYPES,
        LookupKind::WorkOrderCategory => &WORK_ORDER_CATEGORIES,
    }
}

/// SQLite-backed implementation of `LookupRepository`
pub struct SqliteLookupRepository {
    db: Arc<DbManager>,
}

impl SqliteLookupRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LookupRepositoryPort for SqliteLookupRepository {
    async fn list_active(&self, kind: LookupKind) -> DomainResult<Vec<LookupEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<LookupEntry>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT id, name, description, is_active FROM {} WHERE is_active = 1 \
                 ORDER BY name",
                descriptor(kind).table
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_lookup_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, kind: LookupKind, id: i64) -> DomainResult<Option<LookupEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<LookupEntry>> {
            let conn = db.get_connection()?;
            find_entry(&conn, kind, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, kind: LookupKind, entry: LookupEntry) -> DomainResult<LookupEntry> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<LookupEntry> {
            let conn = db.get_connection()?;
            let mut stored = entry;

            let sql = format!(
                "INSERT INTO {} (name, description, is_active) VALUES (?1, ?2, ?3)",
                descriptor(kind).table
            );
            let params: [&dyn ToSql; 3] =
                [&stored.name, &stored.description, &bool_to_int(stored.is_active)];
            conn.execute(&sql, params.as_slice()).map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, kind: LookupKind, entry: LookupEntry) -> DomainResult<LookupEntry> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<LookupEntry> {
            let conn = db.get_connection()?;

            let sql = format!(
                "UPDATE {} SET name = ?1, description = ?2, is_active = ?3 WHERE id = ?4",
                descriptor(kind).table
            );
            let params: [&dyn ToSql; 4] =
                [&entry.name, &entry.description, &bool_to_int(entry.is_active), &entry.id];
            conn.execute(&sql, params.as_slice()).map_err(map_storage_error)?;

            find_entry(&conn, kind, entry.id)?.ok_or_else(|| {
                AlarmDeskError::NotFound(format!("{} {}", kind.label(), entry.id))
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn soft_delete(&self, kind: LookupKind, id: i64) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let sql = format!("UPDATE {} SET is_active = 0 WHERE id = ?1", descriptor(kind).table);
            let changed =
                conn.execute(&sql, params![id]).map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_active_references(&self, kind: LookupKind, id: i64) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            let mut total: i64 = 0;

            for dependent in descriptor(kind).dependents {
                let sql = format!(
                    "SELECT COUNT(*) FROM {} WHERE {} = ?1 AND is_active = 1",
                    dependent.table, dependent.column
                );
                let count: i64 = conn
                    .query_row(&sql, params![id], |row| row.get(0))
                    .map_err(map_storage_error)?;
                total += count;
            }

            Ok(total)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_entry(
    conn: &SqliteConnection,
    kind: LookupKind,
    id: i64,
) -> DomainResult<Option<LookupEntry>> {
    let sql = format!(
        "SELECT id, name, description, is_active FROM {} WHERE id = ?1",
        descriptor(kind).table
    );
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_lookup_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a LookupEntry
fn map_lookup_row(row: &Row) -> rusqlite::Result<LookupEntry> {
    Ok(LookupEntry {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        is_active: int_to_bool(row.get(3)?),
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup_test_db() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path.to_str().unwrap(), 5).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        (Arc::new(manager), temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_crud_applies_to_every_kind() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteLookupRepository::new(db);

        for kind in LookupKind::ALL {
            let entry = LookupEntry {
                id: 0,
                name: "Test Entry".into(),
                description: Some("test".into()),
                is_active: true,
            };
            let stored = repo.insert(kind, entry).await.expect("insert entry");
            assert!(stored.id > 0, "{} should assign an id", kind.label());

            let listed = repo.list_active(kind).await.expect("list entries");
            assert_eq!(listed.len(), 1, "{} should list one row", kind.label());

            let mut changed = stored.clone();
            changed.name = "Renamed".into();
            let updated = repo.update(kind, changed).await.expect("update entry");
            assert_eq!(updated.name, "Renamed");

            assert!(repo.soft_delete(kind, stored.id).await.expect("soft delete"));
            assert!(repo.list_active(kind).await.expect("list again").is_empty());
            assert!(repo.find_by_id(kind, stored.id).await.expect("direct fetch").is_some());
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reference_counts_start_at_zero() {
        let (db, _temp_dir) = setup_test_db();
        let repo = SqliteLookupRepository::new(db);

        for kind in LookupKind::ALL {
            let count = repo.count_active_references(kind, 1).await.expect("count refs");
            assert_eq!(count, 0);
        }
    }
}
