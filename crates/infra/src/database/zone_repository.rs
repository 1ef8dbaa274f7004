//! Zone repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::customers::ports::ZoneRepository as ZoneRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Result as DomainResult, Zone};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const ZONE_COLUMNS: &str = "id, security_system_id, zone_number, signal, description, \
     device_type_id, wireless_id, created_at, is_active";

/// SQLite-backed implementation of `ZoneRepository`
pub struct SqliteZoneRepository {
    db: Arc<DbManager>,
}

impl SqliteZoneRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ZoneRepositoryPort for SqliteZoneRepository {
    async fn list_for_system(&self, security_system_id: i64) -> DomainResult<Vec<Zone>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Zone>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {ZONE_COLUMNS} FROM zones \
                 WHERE is_active = 1 AND security_system_id = ?1 \
                 ORDER BY zone_number"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&security_system_id], map_zone_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Zone>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Zone>> {
            let conn = db.get_connection()?;
            find_zone(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, zone: Zone) -> DomainResult<Zone> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Zone> {
            let conn = db.get_connection()?;
            let mut stored = zone;

            let params: [&dyn ToSql; 8] = [
                &stored.security_system_id,
                &stored.zone_number,
                &stored.signal,
                &stored.description,
                &stored.device_type_id,
                &stored.wireless_id,
                &stored.created_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO zones (
                    security_system_id, zone_number, signal, description, device_type_id,
                    wireless_id, created_at, is_active
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

    async fn update(&self, zone: Zone) -> DomainResult<Zone> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Zone> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 6] = [
                &zone.zone_number,
                &zone.signal,
                &zone.description,
                &zone.device_type_id,
                &zone.wireless_id,
                &zone.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE zones SET
                    zone_number = ?1, signal = ?2, description = ?3, device_type_id = ?4,
                    wireless_id = ?5
                 WHERE id = ?6",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_zone(&conn, zone.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("zone {}", zone.id)))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn soft_delete(&self, id: i64) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("UPDATE zones SET is_active = 0 WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_zone(conn: &SqliteConnection, id: i64) -> DomainResult<Option<Zone>> {
    let sql = format!("SELECT {ZONE_COLUMNS} FROM zones WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_zone_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a Zone
fn map_zone_row(row: &Row) -> rusqlite::Result<Zone> {
    Ok(Zone {
        id: row.get(0)?,
        security_system_id: row.get(1)?,
        zone_number: row.get(2)?,
        signal: row.get(3)?,
        description: row.get(4)?,
        device_type_id: row.get(5)?,
        wireless_id: row.get(6)?,
        created_at: row.get(7)?,
        is_active: int_to_bool(row.get(8)?),
    })
}
