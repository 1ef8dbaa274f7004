//! Call-list repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::customers::ports::CallListRepository as CallListRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, CallListEntry, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const CALL_LIST_COLUMNS: &str =
    "id, security_system_id, priority, name, phone_number, notes, created_at, is_active";

/// SQLite-backed implementation of `CallListRepository`
pub struct SqliteCallListRepository {
    db: Arc<DbManager>,
}

impl SqliteCallListRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CallListRepositoryPort for SqliteCallListRepository {
    async fn list_for_system(&self, security_system_id: i64) -> DomainResult<Vec<CallListEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<CallListEntry>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {CALL_LIST_COLUMNS} FROM call_list_entries \
                 WHERE is_active = 1 AND security_system_id = ?1 \
                 ORDER BY priority"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&security_system_id], map_call_list_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<CallListEntry>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<CallListEntry>> {
            let conn = db.get_connection()?;
            find_entry(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, entry: CallListEntry) -> DomainResult<CallListEntry> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<CallListEntry> {
            let conn = db.get_connection()?;
            let mut stored = entry;

            let params: [&dyn ToSql; 7] = [
                &stored.security_system_id,
                &stored.priority,
                &stored.name,
                &stored.phone_number,
                &stored.notes,
                &stored.created_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO call_list_entries (
                    security_system_id, priority, name, phone_number, notes, created_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, entry: CallListEntry) -> DomainResult<CallListEntry> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<CallListEntry> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 5] = [
                &entry.priority,
                &entry.name,
                &entry.phone_number,
                &entry.notes,
                &entry.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE call_list_entries SET
                    priority = ?1, name = ?2, phone_number = ?3, notes = ?4
                 WHERE id = ?5",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_entry(&conn, entry.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("call list entry {}", entry.id)))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn soft_delete(&self, id: i64) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(
                    "UPDATE call_list_entries SET is_active = 0 WHERE id = ?1",
                    params![id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_entry(conn: &SqliteConnection, id: i64) -> DomainResult<Option<CallListEntry>> {
    let sql = format!("SELECT {CALL_LIST_COLUMNS} FROM call_list_entries WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_call_list_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a CallListEntry
fn map_call_list_row(row: &Row) -> rusqlite::Result<CallListEntry> {
    Ok(CallListEntry {
        id: row.get(0)?,
        security_system_id: row.get(1)?,
        priority: row.get(2)?,
        name: row.get(3)?,
        phone_number: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
        is_active: int_to_bool(row.get(7)?),
    })
}
