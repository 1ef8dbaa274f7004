//! Work-order line-item repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::work_orders::ports::WorkOrderItemRepository as WorkOrderItemRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult, WorkOrderItem};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const ITEM_COLUMNS: &str = "id, work_order_id, description, quantity, unit_price, part_number, \
     notes, created_at, is_active";

/// SQLite-backed implementation of `WorkOrderItemRepository`
pub struct SqliteWorkOrderItemRepository {
    db: Arc<DbManager>,
}

impl SqliteWorkOrderItemRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkOrderItemRepositoryPort for SqliteWorkOrderItemRepository {
    async fn list_for_order(&self, work_order_id: i64) -> DomainResult<Vec<WorkOrderItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrderItem>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {ITEM_COLUMNS} FROM work_order_items \
                 WHERE is_active = 1 AND work_order_id = ?1 \
                 ORDER BY created_at"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&work_order_id], map_item_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<WorkOrderItem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<WorkOrderItem>> {
            let conn = db.get_connection()?;
            find_item(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, item: WorkOrderItem) -> DomainResult<WorkOrderItem> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<WorkOrderItem> {
            let conn = db.get_connection()?;
            let mut stored = item;

            let params: [&dyn ToSql; 8] = [
                &stored.work_order_id,
                &stored.description,
                &stored.quantity,
                &stored.unit_price,
                &stored.part_number,
                &stored.notes,
                &stored.created_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO work_order_items (
                    work_order_id, description, quantity, unit_price, part_number, notes,
                    created_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, item: WorkOrderItem) -> DomainResult<WorkOrderItem> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<WorkOrderItem> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 6] = [
                &item.description,
                &item.quantity,
                &item.unit_price,
                &item.part_number,
                &item.notes,
                &item.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE work_order_items SET
                    description = ?1, quantity = ?2, unit_price = ?3, part_number = ?4, notes = ?5
                 WHERE id = ?6",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_item(&conn, item.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("work order item {}", item.id)))
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
                    "UPDATE work_order_items SET is_active = 0 WHERE id = ?1",
                    params![id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_item(conn: &SqliteConnection, id: i64) -> DomainResult<Option<WorkOrderItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM work_order_items WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_item_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a WorkOrderItem
fn map_item_row(row: &Row) -> rusqlite::Result<WorkOrderItem> {
    Ok(WorkOrderItem {
        id: row.get(0)?,
        work_order_id: row.get(1)?,
        description: row.get(2)?,
        quantity: row.get(3)?,
        unit_price: row.get(4)?,
        part_number: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        is_active: int_to_bool(row.get(8)?),
    })
}
