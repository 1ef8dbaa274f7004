//! Port interfaces for the customer aggregate
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations. List queries return active rows
//! only; `find_by_id` does not filter so soft-deleted rows stay reachable
//! for audit history.

use async_trait::async_trait;
use alarmdesk_domain::{CallListEntry, Contact, Customer, Result, SecuritySystem, Zone};

/// Persistence for customer accounts
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Active customers ordered by last then first name
    async fn list_active(&self) -> Result<Vec<Customer>>;

    /// Fetch by id regardless of active flag
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>>;

    /// Case-insensitive search across names, company, email, address and
    /// phone numbers; active rows only
    async fn search(&self, term: &str) -> Result<Vec<Customer>>;

    /// Active customers with the given customer type
    async fn list_by_type(&self, customer_type_id: i64) -> Result<Vec<Customer>>;

    /// Insert and return the stored row with its assigned id
    async fn insert(&self, customer: Customer) -> Result<Customer>;

    /// Update the editable columns of an existing row
    async fn update(&self, customer: Customer) -> Result<Customer>;

    /// Flip the active flag; false when no such row exists
    async fn soft_delete(&self, id: i64) -> Result<bool>;
}

/// Persistence for customer contacts
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Active contacts for one customer
    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Contact>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>>;

    async fn insert(&self, contact: Contact) -> Result<Contact>;

    async fn update(&self, contact: Contact) -> Result<Contact>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;
}

/// Persistence for installed security systems
#[async_trait]
pub trait SecuritySystemRepository: Send + Sync {
    /// Active systems for one customer, oldest first
    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<SecuritySystem>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<SecuritySystem>>;

    async fn insert(&self, system: SecuritySystem) -> Result<SecuritySystem>;

    async fn update(&self, system: SecuritySystem) -> Result<SecuritySystem>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;
}

/// Persistence for protection zones
#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Active zones for one system, ordered by zone number
    async fn list_for_system(&self, security_system_id: i64) -> Result<Vec<Zone>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>>;

    async fn insert(&self, zone: Zone) -> Result<Zone>;

    async fn update(&self, zone: Zone) -> Result<Zone>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;
}

/// Persistence for central-station call lists
#[async_trait]
pub trait CallListRepository: Send + Sync {
    /// Active entries for one system, ordered by priority
    async fn list_for_system(&self, security_system_id: i64) -> Result<Vec<CallListEntry>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CallListEntry>>;

    async fn insert(&self, entry: CallListEntry) -> Result<CallListEntry>;

    async fn update(&self, entry: CallListEntry) -> Result<CallListEntry>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;
}
