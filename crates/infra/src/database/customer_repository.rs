//! Customer repository implementation over SQLite

use std::sync::Arc;

use alarmdesk_common::storage::sqlite::SqliteConnection;
use alarmdesk_core::customers::ports::CustomerRepository as CustomerRepositoryPort;
use alarmdesk_domain::{Customer, Result as DomainResult};
use async_trait::async_trait;
use rusqlite::{params, Row, ToSql};
use tokio::task;

use super::manager::DbManager;
use super::support::{bool_to_int, int_to_bool, map_join_error, map_storage_error};

const CUSTOMER_COLUMNS: &str = "id, company_name, first_name, last_name, street, city, state, \
     zip_code, county, email_address, home_phone, business_phone, cell_phone, customer_type_id, \
     linked_customer_id, created_at, modified_at, is_active";

/// SQLite-backed implementation of `CustomerRepository`
pub struct SqliteCustomerRepository {
    db: Arc<DbManager>,
}

impl SqliteCustomerRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CustomerRepositoryPort for SqliteCustomerRepository {
    async fn list_active(&self) -> DomainResult<Vec<Customer>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Customer>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE is_active = 1 \
                 ORDER BY last_name, first_name"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[], map_customer_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Customer>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<Customer>> {
            let conn = db.get_connection()?;
            find_customer(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn search(&self, term: &str) -> DomainResult<Vec<Customer>> {
        let db = Arc::clone(&self.db);
        let pattern = format!("%{}%", term.to_lowercase());

        task::spawn_blocking(move || -> DomainResult<Vec<Customer>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE is_active = 1 AND (\
                     LOWER(first_name) LIKE ?1 OR \
                     LOWER(last_name) LIKE ?1 OR \
                     LOWER(COALESCE(company_name, '')) LIKE ?1 OR \
                     LOWER(COALESCE(email_address, '')) LIKE ?1 OR \
                     LOWER(street) LIKE ?1 OR \
                     LOWER(city) LIKE ?1 OR \
                     zip_code LIKE ?1 OR \
                     COALESCE(home_phone, '') LIKE ?1 OR \
                     COALESCE(business_phone, '') LIKE ?1 OR \
                     COALESCE(cell_phone, '') LIKE ?1) \
                 ORDER BY last_name, first_name"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&pattern], map_customer_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_type(&self, customer_type_id: i64) -> DomainResult<Vec<Customer>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<Customer>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers \
                 WHERE is_active = 1 AND customer_type_id = ?1 \
                 ORDER BY last_name, first_name"
            );
            let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
            stmt.query_map(&[&customer_type_id], map_customer_row).map_err(map_storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, customer: Customer) -> DomainResult<Customer> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Customer> {
            let conn = db.get_connection()?;
            let mut stored = customer;

            let params: [&dyn ToSql; 17] = [
                &stored.company_name,
                &stored.first_name,
                &stored.last_name,
                &stored.street,
                &stored.city,
                &stored.state,
                &stored.zip_code,
                &stored.county,
                &stored.email_address,
                &stored.home_phone,
                &stored.business_phone,
                &stored.cell_phone,
                &stored.customer_type_id,
                &stored.linked_customer_id,
                &stored.created_at,
                &stored.modified_at,
                &bool_to_int(stored.is_active),
            ];

            conn.execute(
                "INSERT INTO customers (
                    company_name, first_name, last_name, street, city, state, zip_code, county,
                    email_address, home_phone, business_phone, cell_phone, customer_type_id,
                    linked_customer_id, created_at, modified_at, is_active
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            stored.id = conn.last_insert_rowid();
            Ok(stored)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, customer: Customer) -> DomainResult<Customer> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Customer> {
            let conn = db.get_connection()?;

            let params: [&dyn ToSql; 16] = [
                &customer.company_name,
                &customer.first_name,
                &customer.last_name,
                &customer.street,
                &customer.city,
                &customer.state,
                &customer.zip_code,
                &customer.county,
                &customer.email_address,
                &customer.home_phone,
                &customer.business_phone,
                &customer.cell_phone,
                &customer.customer_type_id,
                &customer.linked_customer_id,
                &customer.modified_at,
                &customer.id, // WHERE clause
            ];

            conn.execute(
                "UPDATE customers SET
                    company_name = ?1, first_name = ?2, last_name = ?3, street = ?4, city = ?5,
                    state = ?6, zip_code = ?7, county = ?8, email_address = ?9, home_phone = ?10,
                    business_phone = ?11, cell_phone = ?12, customer_type_id = ?13,
                    linked_customer_id = ?14, modified_at = ?15
                 WHERE id = ?16",
                params.as_slice(),
            )
            .map_err(map_storage_error)?;

            find_customer(&conn, customer.id)?.ok_or_else(|| {
                alarmdesk_domain::AlarmDeskError::NotFound(format!("customer {}", customer.id))
            })
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
                    "UPDATE customers SET is_active = 0, modified_at = ?1 WHERE id = ?2",
                    params![now, id],
                )
                .map_err(map_storage_error)?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn find_customer(conn: &SqliteConnection, id: i64) -> DomainResult<Option<Customer>> {
    let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");
    let mut stmt = conn.prepare(&sql).map_err(map_storage_error)?;
    let mut rows = stmt.query_map(&[&id], map_customer_row).map_err(map_storage_error)?;
    Ok(rows.pop())
}

/// Map a row to a Customer
fn map_customer_row(row: &Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        company_name: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        street: row.get(4)?,
        city: row.get(5)?,
        state: row.get(6)?,
        zip_code: row.get(7)?,
        county: row.get(8)?,
        email_address: row.get(9)?,
        home_phone: row.get(10)?,
        business_phone: row.get(11)?,
        cell_phone: row.get(12)?,
        customer_type_id: row.get(13)?,
        linked_customer_id: row.get(14)?,
        created_at: row.get(15)?,
        modified_at: row.get(16)?,
        is_active: int_to_bool(row.get(17)?),
    })
}
