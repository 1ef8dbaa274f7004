//! Work-order repository implementation over SQLite
//!
//! Includes the number-sequence lookup behind the year-scoped work-order
//! numbering. Soft-deleted orders keep their numbers, so the lookup does not
//! filter on the active flag.

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_common::storage::StorageError;
use alarmdesk_core::work_orders::ports::WorkOrderRepository as WorkOrderRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult, WorkOrder};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{
    bool_to_int, date_from_sql, date_to_sql, int_to_bool, map_join_error, map_storage_error,
    time_from_sql, time_to_sql,
};

const WORK_ORDER_COLUMNS: &str = "id, number, customer_id, description, work_order_type_id, \
     category_id, status_id, technician_id, scheduled_date, scheduled_start_time, \
     scheduled_end_time, estimated_hours, actual_hours, completed_at, notes, estimated_cost, \
     actual_cost, created_by, created_at, modified_at, is_active";

/// SQLite-backed implementation of `WorkOrderRepository`
pub struct SqliteWorkOrderRepository {
    db: Arc<DbManager>,
}

impl SqliteWorkOrderRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WorkOrderRepositoryPort for SqliteWorkOrderRepository {
    async fn list_active(&self) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders WHERE is_active = 1 \
                 ORDER BY created_at DESC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<WorkOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<WorkOrder>> {
            let conn = db.get_connection()?;
            find_work_order(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_number(&self, number: &str) -> DomainResult<Option<WorkOrder>> {
        let db = Arc::clone(&self.db);
        let number = number.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders \
                 WHERE number = ?1 AND is_active = 1"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            let mut rows = stmt.query_map(&[&number], map_work_order_row).map_err(map_storage_error)?;
            Ok(rows.pop())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);
        let pattern = format!("%{}%", term.to_lowercase());

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {} FROM work_orders w \
                 JOIN customers c ON c.id = w.customer_id \
                 WHERE w.is_active = 1 AND (\
                     LOWER(w.number) LIKE ?1 OR \
                     LOWER(w.description) LIKE ?1 OR \
                     LOWER(COALESCE(w.notes, '')) LIKE ?1 OR \
                     LOWER(c.first_name) LIKE ?1 OR \
                     LOWER(c.last_name) LIKE ?1 OR \
                     LOWER(COALESCE(c.company_name, '')) LIKE ?1) \
                 ORDER BY w.created_at DESC",
                qualified_columns("w")
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&pattern], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_customer(&self, customer_id: i64) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders \
                 WHERE is_active = 1 AND customer_id = ?1 \
                 ORDER BY created_at DESC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&customer_id], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_technician(&self, technician_id: i64) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders \
                 WHERE is_active = 1 AND technician_id = ?1 \
                 ORDER BY scheduled_date, scheduled_start_time"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&technician_id], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_status(&self, status_id: i64) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders \
                 WHERE is_active = 1 AND status_id = ?1 \
                 ORDER BY created_at DESC"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&status_id], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_scheduled_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);
        let start = date_to_sql(Some(start));
        let end = date_to_sql(Some(end));

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            // ISO dates compare correctly as text
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders \
                 WHERE is_active = 1 AND scheduled_date IS NOT NULL \
                 AND scheduled_date >= ?1 AND scheduled_date <= ?2 \
                 ORDER BY scheduled_date, scheduled_start_time"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&start, &end], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_scheduled_on(&self, date: NaiveDate) -> DomainResult<Vec<WorkOrder>> {
        let db = Arc::clone(&self.db);
        let date = date_to_sql(Some(date));

        task::spawn_blocking(move || -> DomainResult<Vec<WorkOrder>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {WORK_ORDER_COLUMNS} FROM work_orders \
                 WHERE is_active = 1 AND scheduled_date = ?1 \
                 ORDER BY scheduled_start_time"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&date], map_work_order_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn last_number_with_prefix(&self, prefix: &str) -> DomainResult<Option<String>> {
        let db = Arc::clone(&self.db);
        let pattern = format!("{prefix}%");

        task::spawn_blocking(move || -> DomainResult<Option<String>> {
            let conn = db.get_connection()?;
            let result = conn.query_row(
                "SELECT number FROM work_orders WHERE number LIKE ?1 \
                 ORDER BY number DESC LIMIT 1",
                params![pattern],
                |row| row.get::<_, String>(0),
            );

            match result {
                Ok(number) => Ok(Some(number)),
                Err(StorageError::Rusqlite(rusqlite::Error::QueryReturnedNoRows)) => Ok(None),
                Err(err) => Err(map_storage_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, order: WorkOrder) -> DomainResult<WorkOrder> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<WorkOrder> {
            let conn = db.get_connection()?;
            let mut stored = order;

            let scheduled_date = date_to_sql(stored.scheduled_date);
            let start_time = time_to_sql(stored.scheduled_start_time);
            let end_time = time_to_sql(stored.scheduled_end_time);

            let params: [&dyn ToSql; 20] = [
                &stored.number,
                &stored.customer_id,
                &stored.description,
                &stored.work_order_type_id,
                &stored.category_id,
                &stored.status_id,
                &stored.technician_id,
                &scheduled_date,
                &start_time,
                &end_time,
                &stored.estimated_hours,
                &stored.actual_hours,
                &stored.completed_at,
                &stored.notes,
                &stored.estimated_cost,
                &stored.actual_cost,
                &stored.created_by,
                &stored.created_at,
                &stored.modified_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO work_orders (
                    number, customer_id, description, work_order_type_id, category_id, status_id,
                    technician_id, scheduled_date, scheduled_start_time, scheduled_end_time,
                    estimated_hours, actual_hours, completed_at, notes, estimated_cost,
                    actual_cost, created_by, created_at, modified_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, order: WorkOrder) -> DomainResult<WorkOrder> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<WorkOrder> {
            let conn = db.get_connection()?;

            let scheduled_date = date_to_sql(order.scheduled_date);
            let start_time = time_to_sql(order.scheduled_start_time);
            let end_time = time_to_sql(order.scheduled_end_time);

            // Deliberately leaves number, customer_id, created_by and
            // created_at untouched.
            let params: [&dyn ToSql; 16] = [
                &order.description,
                &order.work_order_type_id,
                &order.category_id,
                &order.status_id,
                &order.technician_id,
                &scheduled_date,
                &start_time,
                &end_time,
                &order.estimated_hours,
                &order.actual_hours,
                &order.completed_at,
                &order.notes,
                &order.estimated_cost,
                &order.actual_cost,
                &order.modified_at,
                &order.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE work_orders SET
                    description = ?1, work_order_type_id = ?2, category_id = ?3, status_id = ?4,
                    technician_id = ?5, scheduled_date = ?6, scheduled_start_time = ?7,
                    scheduled_end_time = ?8, estimated_hours = ?9, actual_hours = ?10,
                    completed_at = ?11, notes = ?12, estimated_cost = ?13, actual_cost = ?14,
                    modified_at = ?15
                 WHERE id = ?16",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_work_order(&conn, order.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("work order {}", order.id)))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn soft_delete(&self, id: i64) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let now = chrono::Utc::now().timestamp();
            let changed = conn
                .execute(
                    "UPDATE work_orders SET is_active = 0, modified_at = ?1 WHERE id = ?2",
                    params![now, id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn qualified_columns(alias: &str) -> String {
    format!("{alias}.{}", WORK_ORDER_COLUMNS.replace(", ", &format!(", {alias}.")))
}

fn find_work_order(conn: &SqliteConnection, id: i64) -> DomainResult<Option<WorkOrder>> {
    let sql = format!("SELECT {WORK_ORDER_COLUMNS} FROM work_orders WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_work_order_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a WorkOrder
fn map_work_order_row(row: &Row) -> rusqlite::Result<WorkOrder> {
    Ok(WorkOrder {
        id: row.get(0)?,
        number: row.get(1)?,
        customer_id: row.get(2)?,
        description: row.get(3)?,
        work_order_type_id: row.get(4)?,
        category_id: row.get(5)?,
        status_id: row.get(6)?,
        technician_id: row.get(7)?,
        scheduled_date: date_from_sql(row.get(8)?),
        scheduled_start_time: time_from_sql(row.get(9)?),
        scheduled_end_time: time_from_sql(row.get(10)?),
        estimated_hours: row.get(11)?,
        actual_hours: row.get(12)?,
        completed_at: row.get(13)?,
        notes: row.get(14)?,
        estimated_cost: row.get(15)?,
        actual_cost: row.get(16)?,
        created_by: row.get(17)?,
        created_at: row.get(18)?,
        modified_at: row.get(19)?,
        is_active: int_to_bool(row.get(20)?),
    })
}
