//! Panel-type repository implementation over SQLite
//!
//! Panel types carry manufacturer + model instead of the single name the
//! homogeneous lookup tables use, so they get their own repository.

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::settings::ports::PanelTypeRepository as PanelTypeRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, PanelType, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const PANEL_TYPE_COLUMNS: &str = "id, manufacturer, model_number, description, is_active";

/// SQLite-backed implementation of `PanelTypeRepository`
pub struct SqlitePanelTypeRepository {
    db: Arc<DbManager>,
}

impl SqlitePanelTypeRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PanelTypeRepositoryPort for SqlitePanelTypeRepository {
    async fn list_active(&self) -> DomainResult<Vec<PanelType>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<PanelType>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {PANEL_TYPE_COLUMNS} FROM panel_types WHERE is_active = 1 \
                 ORDER BY manufacturer, model_number"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_panel_type_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<PanelType>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<PanelType>> {
            let conn = db.get_connection()?;
            find_panel_type(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, panel_type: PanelType) -> DomainResult<PanelType> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<PanelType> {
            let conn = db.get_connection()?;
            let mut stored = panel_type;

            let params: [&dyn ToSql; 4] = [
                &stored.manufacturer,
                &stored.model_number,
                &stored.description,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO panel_types (manufacturer, model_number, description, is_active) \
                 VALUES (?1, ?2, ?3, ?4)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, panel_type: PanelType) -> DomainResult<PanelType> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<PanelType> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 5] = [
                &panel_type.manufacturer,
                &panel_type.model_number,
                &panel_type.description,
                &bool_to_int(panel_type.is_active),
                &panel_type.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE panel_types SET
                    manufacturer = ?1, model_number = ?2, description = ?3, is_active = ?4
                 WHERE id = ?5",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_panel_type(&conn, panel_type.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("panel type {}", panel_type.id)))
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
                    "UPDATE panel_types SET is_active = 0 WHERE id = ?1",
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
                "SELECT COUNT(*) FROM security_systems \
                 WHERE panel_type_id = ?1 AND is_active = 1",
                params![id],
                |row| row.get(0),
            )
            .map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_panel_type(conn: &SqliteConnection, id: i64) -> DomainResult<Option<PanelType>> {
    let sql = format!("SELECT {PANEL_TYPE_COLUMNS} FROM panel_types WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_panel_type_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a PanelType
fn map_panel_type_row(row: &Row) -> rusqlite::Result<PanelType> {
    Ok(PanelType {
        id: row.get(0)?,
        manufacturer: row.get(1)?,
        model_number: row.get(2)?,
        description: row.get(3)?,
        is_active: int_to_bool(row.get(4)?),
    })
}
