//! Customer service - core business logic
//!
//! Owns the customer aggregate: the account itself plus its contacts,
//! security systems, zones and call-list entries. Validation runs here,
//! before anything reaches a repository.

use std::sync::Arc;

use alarmdesk_common::validation::ValidationError;
use alarmdesk_domain::{
    AlarmDeskError, CallListEntry, Contact, Customer, Result, SecuritySystem, Zone,
};
use chrono::Utc;
use tracing::info;

use super::ports::{
    CallListRepository, ContactRepository, CustomerRepository, SecuritySystemRepository,
    ZoneRepository,
};

/// Customer service
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    contacts: Arc<dyn ContactRepository>,
    systems: Arc<dyn SecuritySystemRepository>,
    zones: Arc<dyn ZoneRepository>,
    call_list: Arc<dyn CallListRepository>,
}

impl CustomerService {
    /// Create a new customer service
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        contacts: Arc<dyn ContactRepository>,
        systems: Arc<dyn SecuritySystemRepository>,
        zones: Arc<dyn ZoneRepository>,
        call_list: Arc<dyn CallListRepository>,
    ) -> Self {
        Self { customers, contacts, systems, zones, call_list }
    }

    // ---------------------------------------------------------------- customers

    /// All active customers, ordered by name
    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.customers.list_active().await
    }

    /// Fetch one customer by id (soft-deleted rows included, for history)
    pub async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        self.customers.find_by_id(id).await
    }

    /// Create a customer after validating its fields
    pub async fn create_customer(&self, mut customer: Customer) -> Result<Customer> {
        validate_customer(&customer)?;

        customer.created_at = Utc::now().timestamp();
        customer.modified_at = None;
        customer.is_active = true;

        let stored = self.customers.insert(customer).await?;
        info!(customer_id = stored.id, "customer created");
        Ok(stored)
    }

    /// Update an existing customer's editable fields
    pub async fn update_customer(&self, mut customer: Customer) -> Result<Customer> {
        validate_customer(&customer)?;

        if self.customers.find_by_id(customer.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("customer {}", customer.id)));
        }

        customer.modified_at = Some(Utc::now().timestamp());
        self.customers.update(customer).await
    }

    /// Soft-delete a customer
    pub async fn delete_customer(&self, id: i64) -> Result<()> {
        if !self.customers.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("customer {id}")));
        }
        info!(customer_id = id, "customer deleted");
        Ok(())
    }

    /// Search active customers; a blank term lists everyone
    pub async fn search_customers(&self, term: &str) -> Result<Vec<Customer>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_customers().await;
        }
        self.customers.search(&term.to_lowercase()).await
    }

    /// Active customers with the given type
    pub async fn customers_by_type(&self, customer_type_id: i64) -> Result<Vec<Customer>> {
        self.customers.list_by_type(customer_type_id).await
    }

    // ----------------------------------------------------------------- contacts

    /// Active contacts for a customer
    pub async fn contacts_for_customer(&self, customer_id: i64) -> Result<Vec<Contact>> {
        self.contacts.list_for_customer(customer_id).await
    }

    /// Add a contact to a customer
    pub async fn add_contact(&self, mut contact: Contact) -> Result<Contact> {
        validate_contact(&contact)?;

        contact.created_at = Utc::now().timestamp();
        contact.is_active = true;
        self.contacts.insert(contact).await
    }

    /// Update a contact
    pub async fn update_contact(&self, contact: Contact) -> Result<Contact> {
        validate_contact(&contact)?;

        if self.contacts.find_by_id(contact.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("contact {}", contact.id)));
        }
        self.contacts.update(contact).await
    }

    /// Soft-delete a contact
    pub async fn delete_contact(&self, id: i64) -> Result<()> {
        if !self.contacts.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("contact {id}")));
        }
        Ok(())
    }

    // --------------------------------------------------------- security systems

    /// Active security systems for a customer
    pub async fn systems_for_customer(&self, customer_id: i64) -> Result<Vec<SecuritySystem>> {
        self.systems.list_for_customer(customer_id).await
    }

    /// Fetch one security system by id
    pub async fn get_system(&self, id: i64) -> Result<Option<SecuritySystem>> {
        self.systems.find_by_id(id).await
    }

    /// Record a new security system installation
    pub async fn add_system(&self, mut system: SecuritySystem) -> Result<SecuritySystem> {
        validate_system(&system)?;

        system.created_at = Utc::now().timestamp();
        system.modified_at = None;
        system.is_active = true;

        let stored = self.systems.insert(system).await?;
        info!(system_id = stored.id, customer_id = stored.customer_id, "security system added");
        Ok(stored)
    }

    /// Update a security system
    pub async fn update_system(&self, mut system: SecuritySystem) -> Result<SecuritySystem> {
        validate_system(&system)?;

        if self.systems.find_by_id(system.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("security system {}", system.id)));
        }

        system.modified_at = Some(Utc::now().timestamp());
        self.systems.update(system).await
    }

    /// Soft-delete a security system
    pub async fn delete_system(&self, id: i64) -> Result<()> {
        if !self.systems.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("security system {id}")));
        }
        info!(system_id = id, "security system deleted");
        Ok(())
    }

    // -------------------------------------------------------------------- zones

    /// Active zones on a system, in zone-number order
    pub async fn zones_for_system(&self, security_system_id: i64) -> Result<Vec<Zone>> {
        self.zones.list_for_system(security_system_id).await
    }

    /// Add a zone to a system
    pub async fn add_zone(&self, mut zone: Zone) -> Result<Zone> {
        validate_zone(&zone)?;

        zone.created_at = Utc::now().timestamp();
        zone.is_active = true;
        self.zones.insert(zone).await
    }

    /// Update a zone
    pub async fn update_zone(&self, zone: Zone) -> Result<Zone> {
        validate_zone(&zone)?;

        if self.zones.find_by_id(zone.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("zone {}", zone.id)));
        }
        self.zones.update(zone).await
    }

    /// Soft-delete a zone
    pub async fn delete_zone(&self, id: i64) -> Result<()> {
        if !self.zones.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("zone {id}")));
        }
        Ok(())
    }

    // ---------------------------------------------------------------- call list

    /// Active call-list entries for a system, in priority order
    pub async fn call_list_for_system(&self, security_system_id: i64) -> Result<Vec<CallListEntry>> {
        self.call_list.list_for_system(security_system_id).await
    }

    /// Add a call-list entry
    pub async fn add_call_list_entry(&self, mut entry: CallListEntry) -> Result<CallListEntry> {
        validate_call_list_entry(&entry)?;

        entry.created_at = Utc::now().timestamp();
        entry.is_active = true;
        self.call_list.insert(entry).await
    }

    /// Update a call-list entry
    pub async fn update_call_list_entry(&self, entry: CallListEntry) -> Result<CallListEntry> {
        validate_call_list_entry(&entry)?;

        if self.call_list.find_by_id(entry.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("call list entry {}", entry.id)));
        }
        self.call_list.update(entry).await
    }

    /// Soft-delete a call-list entry
    pub async fn delete_call_list_entry(&self, id: i64) -> Result<()> {
        if !self.call_list.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("call list entry {id}")));
        }
        Ok(())
    }
}

fn validate_customer(customer: &Customer) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("first_name", &customer.first_name);
    check.require("last_name", &customer.last_name);
    check.require("street", &customer.street);
    check.require("city", &customer.city);
    check.require("state", &customer.state);
    check.check_zip_code("zip_code", &customer.zip_code);
    check.check_email("email_address", customer.email_address.as_deref());
    check.check_phone("home_phone", customer.home_phone.as_deref());
    check.check_phone("business_phone", customer.business_phone.as_deref());
    check.check_phone("cell_phone", customer.cell_phone.as_deref());
    if customer.customer_type_id <= 0 {
        check.add_field_error("customer_type_id", "is required");
    }
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_contact(contact: &Contact) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("name", &contact.name);
    check.check_email("email_address", contact.email_address.as_deref());
    check.check_phone("home_phone", contact.home_phone.as_deref());
    check.check_phone("business_phone", contact.business_phone.as_deref());
    check.check_phone("cell_phone", contact.cell_phone.as_deref());
    if contact.contact_type_id <= 0 {
        check.add_field_error("contact_type_id", "is required");
    }
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_system(system: &SecuritySystem) -> Result<()> {
    let mut check = ValidationError::new();
    if system.customer_id <= 0 {
        check.add_field_error("customer_id", "is required");
    }
    check.check_phone("police_phone", system.police_phone.as_deref());
    check.check_phone("fire_dept_phone", system.fire_dept_phone.as_deref());
    check.check_phone("ambulance_phone", system.ambulance_phone.as_deref());
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_zone(zone: &Zone) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("description", &zone.description);
    if zone.zone_number <= 0 {
        check.add_field_error("zone_number", "must be positive");
    }
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_call_list_entry(entry: &CallListEntry) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("name", &entry.name);
    if entry.phone_number.trim().is_empty() {
        check.add_field_error("phone_number", "is required");
    } else {
        check.check_phone("phone_number", Some(&entry.phone_number));
    }
    if entry.priority <= 0 {
        check.add_field_error("priority", "must be positive");
    }
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}
