//! Contact repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::customers::ports::ContactRepository as ContactRepositoryPort;
use alarmdesk_domain::{AlarmDeskError, Contact, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const CONTACT_COLUMNS: &str = "id, customer_id, name, home_phone, business_phone, cell_phone, \
     email_address, contact_type_id, created_at, is_active";

/// SQLite-backed implementation of `ContactRepository`
pub struct SqliteContactRepository {
    db: Arc<DbManager>,
}

impl SqliteContactRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactRepositoryPort for SqliteContactRepository {
    async fn list_for_customer(&self, customer_id: i64) -> DomainResult<Vec<Contact>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Contact>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts \
                 WHERE is_active = 1 AND customer_id = ?1 \
                 ORDER BY contact_type_id, name"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&customer_id], map_contact_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Contact>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Contact>> {
            let conn = db.get_connection()?;
            find_contact(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, contact: Contact) -> DomainResult<Contact> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Contact> {
            let conn = db.get_connection()?;
            let mut stored = contact;

            let params: [&dyn ToSql; 9] = [
                &stored.customer_id,
                &stored.name,
                &stored.home_phone,
                &stored.business_phone,
                &stored.cell_phone,
                &stored.email_address,
                &stored.contact_type_id,
                &stored.created_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO contacts (
                    customer_id, name, home_phone, business_phone, cell_phone, email_address,
                    contact_type_id, created_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, contact: Contact) -> DomainResult<Contact> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Contact> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 7] = [
                &contact.name,
                &contact.home_phone,
                &contact.business_phone,
                &contact.cell_phone,
                &contact.email_address,
                &contact.contact_type_id,
                &contact.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE contacts SET
                    name = ?1, home_phone = ?2, business_phone = ?3, cell_phone = ?4,
                    email_address = ?5, contact_type_id = ?6
                 WHERE id = ?7",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_contact(&conn, contact.id)?
                .ok_or_else(|| AlarmDeskError::NotFound(format!("contact {}", contact.id)))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn soft_delete(&self, id: i64) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute("UPDATE contacts SET is_active = 0 WHERE id = ?1", params![id])
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_contact(conn: &SqliteConnection, id: i64) -> DomainResult<Option<Contact>> {
    let sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_contact_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a Contact
fn map_contact_row(row: &Row) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        name: row.get(2)?,
        home_phone: row.get(3)?,
        business_phone: row.get(4)?,
        cell_phone: row.get(5)?,
        email_address: row.get(6)?,
        contact_type_id: row.get(7)?,
        created_at: row.get(8)?,
        is_active: int_to_bool(row.get(9)?),
    })
}
