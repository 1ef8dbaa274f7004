//! Work-order status repository implementation over SQLite
//!
//! Statuses add a UI color code and an explicit sort order on top of the
//! common lookup shape.

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::settings::ports::WorkOrderStatusRepository as WorkOrderStatusRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult, WorkOrderStatus};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const STATUS_COLUMNS: &str = "id, name, description, color_code, sort_order, is_active";

/// SQLite-backed implementation of `WorkOrderStatusRepository`
pub struct SqliteStatusRepository {
    db: Arc<DbManager>,
}

impl SqliteStatusRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkOrderStatusRepositoryPort for SqliteStatusRepository {
    async fn list_active(&self) -> DomainResult<Vec<WorkOrderStatus>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrderStatus>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {STATUS_COLUMNS} FROM work_order_statuses WHERE is_active = 1 \
                 ORDER BY sort_order"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_status_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<WorkOrderStatus>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<WorkOrderStatus>> {
            let conn = db.get_connection()?;
            find_status(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, status: WorkOrderStatus) -> DomainResult<WorkOrderStatus> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<WorkOrderStatus> {
            let conn = db.get_connection()?;
            let mut stored = status;

            let params: [&dyn ToSql; 5] = [
                &stored.name,
                &stored.description,
                &stored.color_code,
                &stored.sort_order,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO work_order_statuses (name, description, color_code, sort_order, is_active) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, status: WorkOrderStatus) -> DomainResult<WorkOrderStatus> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<WorkOrderStatus> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 6] = [
                &status.name,
                &status.description,
                &status.color_code,
                &status.sort_order,
                &bool_to_int(status.is_active),
                &status.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE work_order_statuses SET
                    name = ?1, description = ?2, color_code = ?3, sort_order = ?4, is_active = ?5
                 WHERE id = ?6",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_status(&conn, status.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("work order status {}", status.id)))
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
                    "UPDATE work_order_statuses SET is_active = 0 WHERE id = ?1",
                    params![id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_active_references(&self, id: i64) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM work_orders WHERE status_id = ?1 AND is_active = 1",
                params![id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_status(conn: &SqliteConnection, id: i64) -> DomainResult<Option<WorkOrderStatus>> {
    let sql = format!("SELECT {STATUS_COLUMNS} FROM work_order_statuses WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_status_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a WorkOrderStatus
fn map_status_row(row: &Row) -> rusqlite::Result<WorkOrderStatus> {
    Ok(WorkOrderStatus {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        color_code: row.get(3)?,
        sort_order: row.get(4)?,
        is_active: int_to_bool(row.get(5)?),
    })
}
