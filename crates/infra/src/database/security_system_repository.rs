//! Security-system repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::customers::ports::SecuritySystemRepository as SecuritySystemRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult, SecuritySystem};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{
    bool_to_int, date_from_sql, date_to_sql, int_to_bool, map_join_error, map_storage_error,
};

const SYSTEM_COLUMNS: &str = "id, customer_id, central_station_number, panel_type_id, \
     monitoring_type_id, monitoring_start_date, installed_date, master_security_code, code_word, \
     police_phone, fire_dept_phone, ambulance_phone, city_permit_number, permit_due_date, \
     authority_notes, primary_communicator_id, secondary_communicator_id, created_at, \
     modified_at, is_active";

/// SQLite-backed implementation of `SecuritySystemRepository`
pub struct SqliteSecuritySystemRepository {
    db: Arc<DbManager>,
}

impl SqliteSecuritySystemRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SecuritySystemRepositoryPort for SqliteSecuritySystemRepository {
    async fn list_for_customer(&self, customer_id: i64) -> DomainResult<Vec<SecuritySystem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<SecuritySystem>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {SYSTEM_COLUMNS} FROM security_systems \
                 WHERE is_active = 1 AND customer_id = ?1 \
                 ORDER BY created_at"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&customer_id], map_system_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<SecuritySystem>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<SecuritySystem>> {
            let conn = db.get_connection()?;
            find_system(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, system: SecuritySystem) -> DomainResult<SecuritySystem> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<SecuritySystem> {
            let conn = db.get_connection()?;
            let mut stored = system;

            let monitoring_start = date_to_sql(stored.monitoring_start_date);
            let installed = date_to_sql(stored.installed_date);
            let permit_due = date_to_sql(stored.permit_due_date);

            let params: [&dyn ToSql; 19] = [
                &stored.customer_id,
                &stored.central_station_number,
                &stored.panel_type_id,
                &stored.monitoring_type_id,
                &monitoring_start,
                &installed,
                &stored.master_security_code,
                &stored.code_word,
                &stored.police_phone,
                &stored.fire_dept_phone,
                &stored.ambulance_phone,
                &stored.city_permit_number,
                &permit_due,
                &stored.authority_notes,
                &stored.primary_communicator_id,
                &stored.secondary_communicator_id,
                &stored.created_at,
                &stored.modified_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO security_systems (
                    customer_id, central_station_number, panel_type_id, monitoring_type_id,
                    monitoring_start_date, installed_date, master_security_code, code_word,
                    police_phone, fire_dept_phone, ambulance_phone, city_permit_number,
                    permit_due_date, authority_notes, primary_communicator_id,
                    secondary_communicator_id, created_at, modified_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, system: SecuritySystem) -> DomainResult<SecuritySystem> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<SecuritySystem> {
            let conn = db.get_connection()?;

            let monitoring_start = date_to_sql(system.monitoring_start_date);
            let installed = date_to_sql(system.installed_date);
            let permit_due = date_to_sql(system.permit_due_date);

            let params: [&dyn ToSql; 17] = [
                &system.central_station_number,
                &system.panel_type_id,
                &system.monitoring_type_id,
                &monitoring_start,
                &installed,
                &system.master_security_code,
                &system.code_word,
                &system.police_phone,
                &system.fire_dept_phone,
                &system.ambulance_phone,
                &system.city_permit_number,
                &permit_due,
                &system.authority_notes,
                &system.primary_communicator_id,
                &system.secondary_communicator_id,
                &system.modified_at,
                &system.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE security_systems SET
                    central_station_number = ?1, panel_type_id = ?2, monitoring_type_id = ?3,
                    monitoring_start_date = ?4, installed_date = ?5, master_security_code = ?6,
                    code_word = ?7, police_phone = ?8, fire_dept_phone = ?9, ambulance_phone = ?10,
                    city_permit_number = ?11, permit_due_date = ?12, authority_notes = ?13,
                    primary_communicator_id = ?14, secondary_communicator_id = ?15,
                    modified_at = ?16
                 WHERE id = ?17",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_system(&conn, system.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("security system {}", system.id)))
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
                    "UPDATE security_systems SET is_active = 0, modified_at = ?1 WHERE id = ?2",
                    params![now, id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_system(conn: &SqliteConnection, id: i64) -> DomainResult<Option<SecuritySystem>> {
    let sql = format!("SELECT {SYSTEM_COLUMNS} FROM security_systems WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_system_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a SecuritySystem
fn map_system_row(row: &Row) -> rusqlite::Result<SecuritySystem> {
    Ok(SecuritySystem {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        central_station_number: row.get(2)?,
        panel_type_id: row.get(3)?,
        monitoring_type_id: row.get(4)?,
        monitoring_start_date: date_from_sql(row.get(5)?),
        installed_date: date_from_sql(row.get(6)?),
        master_security_code: row.get(7)?,
        code_word: row.get(8)?,
        police_phone: row.get(9)?,
        fire_dept_phone: row.get(10)?,
        ambulance_phone: row.get(11)?,
        city_permit_number: row.get(12)?,
        permit_due_date: date_from_sql(row.get(13)?),
        authority_notes: row.get(14)?,
        primary_communicator_id: row.get(15)?,
        secondary_communicator_id: row.get(16)?,
        created_at: row.get(17)?,
        modified_at: row.get(18)?,
        is_active: int_to_bool(row.get(19)?),
    })
}
