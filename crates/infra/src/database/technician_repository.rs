//! Technician repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::settings::ports::TechnicianRepository as TechnicianRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult, Technician, WorkOrderStatusCode};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{
    bool_to_int, date_from_sql, date_to_sql, int_to_bool, map_join_error, map_storage_error,
};

const TECHNICIAN_COLUMNS: &str = "id, first_name, last_name, email_address, phone_number, \
     cell_phone, employee_number, hire_date, specializations, certifications, created_at, \
     is_active";

/// SQLite-backed implementation of `TechnicianRepository`
pub struct SqliteTechnicianRepository {
    db: Arc<DbManager>,
}

impl SqliteTechnicianRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TechnicianRepositoryPort for SqliteTechnicianRepository {
    async fn list_active(&self) -> DomainResult<Vec<Technician>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Technician>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {TECHNICIAN_COLUMNS} FROM technicians WHERE is_active = 1 \
                 ORDER BY last_name, first_name"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_technician_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Technician>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Technician>> {
            let conn = db.get_connection()?;
            find_technician(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, technician: Technician) -> DomainResult<Technician> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Technician> {
            let conn = db.get_connection()?;
            let mut stored = technician;

            let hire_date = date_to_sql(stored.hire_date);

            let params: [&dyn ToSql; 11] = [
                &stored.first_name,
                &stored.last_name,
                &stored.email_address,
                &stored.phone_number,
                &stored.cell_phone,
                &stored.employee_number,
                &hire_date,
                &stored.specializations,
                &stored.certifications,
                &stored.created_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO technicians (
                    first_name, last_name, email_address, phone_number, cell_phone,
                    employee_number, hire_date, specializations, certifications, created_at,
                    is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, technician: Technician) -> DomainResult<Technician> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Technician> {
            let conn = db.get_connection()?;

            let hire_date = date_to_sql(technician.hire_date);

            let params: [&dyn ToSql; 11] = [
                &technician.first_name,
                &technician.last_name,
                &technician.email_address,
                &technician.phone_number,
                &technician.cell_phone,
                &technician.employee_number,
                &hire_date,
                &technician.specializations,
                &technician.certifications,
                &bool_to_int(technician.is_active),
                &technician.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE technicians SET
                    first_name = ?1, last_name = ?2, email_address = ?3, phone_number = ?4,
                    cell_phone = ?5, employee_number = ?6, hire_date = ?7, specializations = ?8,
                    certifications = ?9, is_active = ?10
                 WHERE id = ?11",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_technician(&conn, technician.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("technician {}", technician.id)))
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
                    "UPDATE technicians SET is_active = 0 WHERE id = ?1",
                    params![id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_open_work_orders(&self, id: i64) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            let completed = WorkOrderStatusCode::Completed.as_id();
            let canceled = WorkOrderStatusCode::Canceled.as_id();
            conn.query_row(
                "SELECT COUNT(*) FROM work_orders \
                 WHERE technician_id = ?1 AND is_active = 1 \
                 AND status_id NOT IN (?2, ?3)",
                params![id, completed, canceled],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_technician(conn: &SqliteConnection, id: i64) -> DomainResult<Option<Technician>> {
    let sql = format!("SELECT {TECHNICIAN_COLUMNS} FROM technicians WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_technician_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a Technician
fn map_technician_row(row: &Row) -> rusqlite::Result<Technician> {
    Ok(Technician {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email_address: row.get(3)?,
        phone_number: row.get(4)?,
        cell_phone: row.get(5)?,
        employee_number: row.get(6)?,
        hire_date: date_from_sql(row.get(7)?),
        specializations: row.get(8)?,
        certifications: row.get(9)?,
        created_at: row.get(10)?,
        is_active: int_to_bool(row.get(11)?),
    })
}
