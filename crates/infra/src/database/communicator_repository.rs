//! Communicator repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::settings::ports::CommunicatorRepository as CommunicatorRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Communicator, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const COMMUNICATOR_COLUMNS: &str = "id, communicator_type_id, manufacturer, model_number, \
     radio_id, ip_address, gateway, subnet, phone_number_1, phone_number_2, notes, created_at, \
     is_active";

/// SQLite-backed implementation of `CommunicatorRepository`
pub struct SqliteCommunicatorRepository {
    db: Arc<DbManager>,
}

impl SqliteCommunicatorRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommunicatorRepositoryPort for SqliteCommunicatorRepository {
    async fn list_active(&self) -> DomainResult<Vec<Communicator>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Communicator>> {
            let conn = db.get_connection()?;
            // Ordered by type name for settings screens, then hardware identity
            let sql = format!(
                "SELECT c.{} FROM communicators c \
                 JOIN communicator_types t ON t.id = c.communicator_type_id \
                 WHERE c.is_active = 1 \
                 ORDER BY t.name, c.manufacturer, c.model_number",
                COMMUNICATOR_COLUMNS.replace(", ", ", c.")
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_communicator_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Communicator>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Communicator>> {
            let conn = db.get_connection()?;
            find_communicator(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, communicator: Communicator) -> DomainResult<Communicator> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Communicator> {
            let conn = db.get_connection()?;
            let mut stored = communicator;

            let params: [&dyn ToSql; 12] = [
                &stored.communicator_type_id,
                &stored.manufacturer,
                &stored.model_number,
                &stored.radio_id,
                &stored.ip_address,
                &stored.gateway,
                &stored.subnet,
                &stored.phone_number_1,
                &stored.phone_number_2,
                &stored.notes,
                &stored.created_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO communicators (
                    communicator_type_id, manufacturer, model_number, radio_id, ip_address,
                    gateway, subnet, phone_number_1, phone_number_2, notes, created_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, communicator: Communicator) -> DomainResult<Communicator> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Communicator> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 12] = [
                &communicator.communicator_type_id,
                &communicator.manufacturer,
                &communicator.model_number,
                &communicator.radio_id,
                &communicator.ip_address,
                &communicator.gateway,
                &communicator.subnet,
                &communicator.phone_number_1,
                &communicator.phone_number_2,
                &communicator.notes,
                &bool_to_int(communicator.is_active),
                &communicator.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE communicators SET
                    communicator_type_id = ?1, manufacturer = ?2, model_number = ?3,
                    radio_id = ?4, ip_address = ?5, gateway = ?6, subnet = ?7,
                    phone_number_1 = ?8, phone_number_2 = ?9, notes = ?10, is_active = ?11
                 WHERE id = ?12",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_communicator(&conn, communicator.id)?.ok_or_else(|| {
                AlarmDeskError::NotFound(format!("communicator {}", communicator.id))
            })
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
                    "UPDATE communicators SET is_active = 0 WHERE id = ?1",
                    params![id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_active_system_references(&self, id: i64) -> DomainResult<i64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<i64> {
            let conn = db.get_connection()?;
            conn.query_row(
                "SELECT COUNT(*) FROM security_systems \
                 WHERE (primary_communicator_id = ?1 OR secondary_communicator_id = ?1) \
                 AND is_active = 1",
                params![id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_communicator(conn: &SqliteConnection, id: i64) -> DomainResult<Option<Communicator>> {
    let sql = format!("SELECT {COMMUNICATOR_COLUMNS} FROM communicators WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_communicator_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a Communicator
fn map_communicator_row(row: &Row) -> rusqlite::Result<Communicator> {
    Ok(Communicator {
        id: row.get(0)?,
        communicator_type_id: row.get(1)?,
        manufacturer: row.get(2)?,
        model_number: row.get(3)?,
        radio_id: row.get(4)?,
        ip_address: row.get(5)?,
        gateway: row.get(6)?,
        subnet: row.get(7)?,
        phone_number_1: row.get(8)?,
        phone_number_2: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
        is_active: int_to_bool(row.get(12)?),
    })
}
