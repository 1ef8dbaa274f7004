//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for the core repository ports, enabling
//! deterministic unit tests without database dependencies. Each mock stores
//! rows in a `Mutex<Vec<_>>` and hands out ids from a counter, mimicking
//! database-assigned rowids. List queries filter on the active flag;
//! id lookups do not, matching the port contracts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use alarmdesk_core::customers::ports::{
    CallListRepository, ContactRepository, CustomerRepository, SecuritySystemRepository,
    ZoneRepository,
};
use alarmdesk_core::settings::ports::{
    CommunicatorRepository, LookupRepository, PanelTypeRepository, TechnicianRepository,
    WorkOrderStatusRepository,
};
use alarmdesk_core::work_orders::ports::{WorkOrderItemRepository, WorkOrderRepository};
use alarmdesk_domain::{
    AlarmDeskError, CallListEntry, Communicator, Contact, Customer, LookupEntry, LookupKind,
    PanelType, Result, SecuritySystem, Technician, WorkOrder, WorkOrderItem, WorkOrderStatus, Zone,
};
use async_trait::async_trait;
use chrono::NaiveDate;

fn lock_poisoned() -> AlarmDeskError {
    AlarmDeskError::Internal("mock lock poisoned".into())
}

// ---------------------------------------------------------------- customers

/// In-memory mock for `CustomerRepository`
#[derive(Default)]
pub struct MockCustomerRepository {
    rows: Mutex<Vec<Customer>>,
    next_id: AtomicI64,
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn list_active(&self) -> Result<Vec<Customer>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let mut active: Vec<_> = rows.iter().filter(|c| c.is_active).cloned().collect();
        active.sort_by(|a, b| {
            a.last_name.cmp(&b.last_name).then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(active)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn search(&self, term: &str) -> Result<Vec<Customer>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows
            .iter()
            .filter(|c| {
                c.is_active
                    && (c.first_name.to_lowercase().contains(term)
                        || c.last_name.to_lowercase().contains(term)
                        || c.company_name.as_deref().is_some_and(|n| n.to_lowercase().contains(term))
                        || c.email_address
                            .as_deref()
                            .is_some_and(|n| n.to_lowercase().contains(term)))
            })
            .cloned()
            .collect())
    }

    async fn list_by_type(&self, customer_type_id: i64) -> Result<Vec<Customer>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows
            .iter()
            .filter(|c| c.is_active && c.customer_type_id == customer_type_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, mut customer: Customer) -> Result<Customer> {
        customer.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: Customer) -> Result<Customer> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("customer {}", customer.id)))?;
        let created_at = row.created_at;
        *row = customer;
        row.created_at = created_at;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory mock for `ContactRepository`
#[derive(Default)]
pub struct MockContactRepository {
    rows: Mutex<Vec<Contact>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ContactRepository for MockContactRepository {
    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<Contact>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|c| c.is_active && c.customer_id == customer_id).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, mut contact: Contact) -> Result<Contact> {
        contact.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(contact.clone());
        Ok(contact)
    }

    async fn update(&self, contact: Contact) -> Result<Contact> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|c| c.id == contact.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("contact {}", contact.id)))?;
        *row = contact;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory mock for `SecuritySystemRepository`
#[derive(Default)]
pub struct MockSecuritySystemRepository {
    rows: Mutex<Vec<SecuritySystem>>,
    next_id: AtomicI64,
}

#[async_trait]
impl SecuritySystemRepository for MockSecuritySystemRepository {
    async fn list_for_customer(&self, customer_id: i64) -> Result<Vec<SecuritySystem>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|s| s.is_active && s.customer_id == customer_id).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SecuritySystem>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, mut system: SecuritySystem) -> Result<SecuritySystem> {
        system.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(system.clone());
        Ok(system)
    }

    async fn update(&self, system: SecuritySystem) -> Result<SecuritySystem> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|s| s.id == system.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("security system {}", system.id)))?;
        *row = system;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|s| s.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory mock for `ZoneRepository`
#[derive(Default)]
pub struct MockZoneRepository {
    rows: Mutex<Vec<Zone>>,
    next_id: AtomicI64,
}

#[async_trait]
impl ZoneRepository for MockZoneRepository {
    async fn list_for_system(&self, security_system_id: i64) -> Result<Vec<Zone>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let mut zones: Vec<_> = rows
            .iter()
            .filter(|z| z.is_active && z.security_system_id == security_system_id)
            .cloned()
            .collect();
        zones.sort_by_key(|z| z.zone_number);
        Ok(zones)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|z| z.id == id).cloned())
    }

    async fn insert(&self, mut zone: Zone) -> Result<Zone> {
        zone.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(zone.clone());
        Ok(zone)
    }

    async fn update(&self, zone: Zone) -> Result<Zone> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|z| z.id == zone.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("zone {}", zone.id)))?;
        *row = zone;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|z| z.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory mock for `CallListRepository`
#[derive(Default)]
pub struct MockCallListRepository {
    rows: Mutex<Vec<CallListEntry>>,
    next_id: AtomicI64,
}

#[async_trait]
impl CallListRepository for MockCallListRepository {
    async fn list_for_system(&self, security_system_id: i64) -> Result<Vec<CallListEntry>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let mut entries: Vec<_> = rows
            .iter()
            .filter(|e| e.is_active && e.security_system_id == security_system_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.priority);
        Ok(entries)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CallListEntry>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, mut entry: CallListEntry) -> Result<CallListEntry> {
        entry.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry: CallListEntry) -> Result<CallListEntry> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("call list entry {}", entry.id)))?;
        *row = entry;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|e| e.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// -------------------------------------------------------------- work orders

/// In-memory mock for `WorkOrderRepository`
///
/// Setting `fail_number_lookup` makes `last_number_with_prefix` return an
/// error so tests can drive the timestamp-fallback path.
#[derive(Default)]
pub struct MockWorkOrderRepository {
    rows: Mutex<Vec<WorkOrder>>,
    next_id: AtomicI64,
    pub fail_number_lookup: AtomicBool,
}

#[async_trait]
impl WorkOrderRepository for MockWorkOrderRepository {
    async fn list_active(&self) -> Result<Vec<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let mut active: Vec<_> = rows.iter().filter(|o| o.is_active).cloned().collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_number(&self, number: &str) -> Result<Option<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|o| o.is_active && o.number == number).cloned())
    }

    async fn search(&self, term: &str) -> Result<Vec<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows
            .iter()
            .filter(|o| {
                o.is_active
                    && (o.number.to_lowercase().contains(term)
                        || o.description.to_lowercase().contains(term)
                        || o.notes.as_deref().is_some_and(|n| n.to_lowercase().contains(term)))
            })
            .cloned()
            .collect())
    }

    async fn list_by_customer(&self, customer_id: i64) -> Result<Vec<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|o| o.is_active && o.customer_id == customer_id).cloned().collect())
    }

    async fn list_by_technician(&self, technician_id: i64) -> Result<Vec<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows
            .iter()
            .filter(|o| o.is_active && o.technician_id == Some(technician_id))
            .cloned()
            .collect())
    }

    async fn list_by_status(&self, status_id: i64) -> Result<Vec<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|o| o.is_active && o.status_id == status_id).cloned().collect())
    }

    async fn list_scheduled_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkOrder>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows
            .iter()
            .filter(|o| o.is_active && o.scheduled_date.is_some_and(|d| d >= start && d <= end))
            .cloned()
            .collect())
    }

    async fn list_scheduled_on(&self, date: NaiveDate) -> Result<Vec<WorkOrder>> {
        self.list_scheduled_between(date, date).await
    }

    async fn last_number_with_prefix(&self, prefix: &str) -> Result<Option<String>> {
        if self.fail_number_lookup.load(Ordering::SeqCst) {
            return Err(AlarmDeskError::Database("number lookup failed".into()));
        }
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().map(|o| o.number.clone()).filter(|n| n.starts_with(prefix)).max())
    }

    async fn insert(&self, mut order: WorkOrder) -> Result<WorkOrder> {
        order.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(order.clone());
        Ok(order)
    }

    async fn update(&self, order: WorkOrder) -> Result<WorkOrder> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("work order {}", order.id)))?;
        // The number column is immutable; keep whatever was assigned.
        let number = row.number.clone();
        let created_at = row.created_at;
        *row = order;
        row.number = number;
        row.created_at = created_at;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|o| o.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory mock for `WorkOrderItemRepository`
#[derive(Default)]
pub struct MockWorkOrderItemRepository {
    rows: Mutex<Vec<WorkOrderItem>>,
    next_id: AtomicI64,
}

#[async_trait]
impl WorkOrderItemRepository for MockWorkOrderItemRepository {
    async fn list_for_order(&self, work_order_id: i64) -> Result<Vec<WorkOrderItem>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|i| i.is_active && i.work_order_id == work_order_id).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkOrderItem>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|i| i.id == id).cloned())
    }

    async fn insert(&self, mut item: WorkOrderItem) -> Result<WorkOrderItem> {
        item.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(item.clone());
        Ok(item)
    }

    async fn update(&self, item: WorkOrderItem) -> Result<WorkOrderItem> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|i| i.id == item.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("work order item {}", item.id)))?;
        *row = item;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|i| i.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ----------------------------------------------------------------- settings

/// In-memory mock for `LookupRepository`
///
/// Reference counts are injected per (kind, id) so tests can exercise the
/// delete guard without modeling the dependent tables.
#[derive(Default)]
pub struct MockLookupRepository {
    rows: Mutex<HashMap<LookupKind, Vec<LookupEntry>>>,
    references: Mutex<HashMap<(LookupKind, i64), i64>>,
    next_id: AtomicI64,
}

impl MockLookupRepository {
    pub fn set_references(&self, kind: LookupKind, id: i64, count: i64) {
        if let Ok(mut refs) = self.references.lock() {
            refs.insert((kind, id), count);
        }
    }
}

#[async_trait]
impl LookupRepository for MockLookupRepository {
    async fn list_active(&self, kind: LookupKind) -> Result<Vec<LookupEntry>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let mut active: Vec<LookupEntry> = rows
            .get(&kind)
            .map(|entries| entries.iter().filter(|e| e.is_active).cloned().collect())
            .unwrap_or_default();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn find_by_id(&self, kind: LookupKind, id: i64) -> Result<Option<LookupEntry>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.get(&kind).and_then(|entries| entries.iter().find(|e| e.id == id).cloned()))
    }

    async fn insert(&self, kind: LookupKind, mut entry: LookupEntry) -> Result<LookupEntry> {
        entry.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.entry(kind).or_default().push(entry.clone());
        Ok(entry)
    }

    async fn update(&self, kind: LookupKind, entry: LookupEntry) -> Result<LookupEntry> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let entries = rows.entry(kind).or_default();
        let row = entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("{} {}", kind.label(), entry.id)))?;
        *row = entry;
        Ok(row.clone())
    }

    async fn soft_delete(&self, kind: LookupKind, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.entry(kind).or_default().iter_mut().find(|e| e.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_active_references(&self, kind: LookupKind, id: i64) -> Result<i64> {
        let refs = self.references.lock().map_err(|_| lock_poisoned())?;
        Ok(refs.get(&(kind, id)).copied().unwrap_or(0))
    }
}

/// In-memory mock for `PanelTypeRepository`
#[derive(Default)]
pub struct MockPanelTypeRepository {
    rows: Mutex<Vec<PanelType>>,
    references: Mutex<HashMap<i64, i64>>,
    next_id: AtomicI64,
}

impl MockPanelTypeRepository {
    pub fn set_references(&self, id: i64, count: i64) {
        if let Ok(mut refs) = self.references.lock() {
            refs.insert(id, count);
        }
    }
}

#[async_trait]
impl PanelTypeRepository for MockPanelTypeRepository {
    async fn list_active(&self) -> Result<Vec<PanelType>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|p| p.is_active).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PanelType>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, mut panel_type: PanelType) -> Result<PanelType> {
        panel_type.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(panel_type.clone());
        Ok(panel_type)
    }

    async fn update(&self, panel_type: PanelType) -> Result<PanelType> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|p| p.id == panel_type.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("panel type {}", panel_type.id)))?;
        *row = panel_type;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|p| p.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_active_references(&self, id: i64) -> Result<i64> {
        let refs = self.references.lock().map_err(|_| lock_poisoned())?;
        Ok(refs.get(&id).copied().unwrap_or(0))
    }
}

/// In-memory mock for `WorkOrderStatusRepository`
#[derive(Default)]
pub struct MockStatusRepository {
    rows: Mutex<Vec<WorkOrderStatus>>,
    references: Mutex<HashMap<i64, i64>>,
    next_id: AtomicI64,
}

impl MockStatusRepository {
    pub fn set_references(&self, id: i64, count: i64) {
        if let Ok(mut refs) = self.references.lock() {
            refs.insert(id, count);
        }
    }
}

#[async_trait]
impl WorkOrderStatusRepository for MockStatusRepository {
    async fn list_active(&self) -> Result<Vec<WorkOrderStatus>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let mut active: Vec<_> = rows.iter().filter(|s| s.is_active).cloned().collect();
        active.sort_by_key(|s| s.sort_order);
        Ok(active)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkOrderStatus>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, mut status: WorkOrderStatus) -> Result<WorkOrderStatus> {
        status.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(status.clone());
        Ok(status)
    }

    async fn update(&self, status: WorkOrderStatus) -> Result<WorkOrderStatus> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|s| s.id == status.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("work order status {}", status.id)))?;
        *row = status;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|s| s.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_active_references(&self, id: i64) -> Result<i64> {
        let refs = self.references.lock().map_err(|_| lock_poisoned())?;
        Ok(refs.get(&id).copied().unwrap_or(0))
    }
}

/// In-memory mock for `CommunicatorRepository`
#[derive(Default)]
pub struct MockCommunicatorRepository {
    rows: Mutex<Vec<Communicator>>,
    references: Mutex<HashMap<i64, i64>>,
    next_id: AtomicI64,
}

impl MockCommunicatorRepository {
    pub fn set_references(&self, id: i64, count: i64) {
        if let Ok(mut refs) = self.references.lock() {
            refs.insert(id, count);
        }
    }
}

#[async_trait]
impl CommunicatorRepository for MockCommunicatorRepository {
    async fn list_active(&self) -> Result<Vec<Communicator>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|c| c.is_active).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Communicator>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, mut communicator: Communicator) -> Result<Communicator> {
        communicator.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(communicator.clone());
        Ok(communicator)
    }

    async fn update(&self, communicator: Communicator) -> Result<Communicator> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|c| c.id == communicator.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("communicator {}", communicator.id)))?;
        *row = communicator;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_active_system_references(&self, id: i64) -> Result<i64> {
        let refs = self.references.lock().map_err(|_| lock_poisoned())?;
        Ok(refs.get(&id).copied().unwrap_or(0))
    }
}

/// In-memory mock for `TechnicianRepository`
#[derive(Default)]
pub struct MockTechnicianRepository {
    rows: Mutex<Vec<Technician>>,
    open_orders: Mutex<HashMap<i64, i64>>,
    next_id: AtomicI64,
}

impl MockTechnicianRepository {
    pub fn set_open_work_orders(&self, id: i64, count: i64) {
        if let Ok(mut orders) = self.open_orders.lock() {
            orders.insert(id, count);
        }
    }
}

#[async_trait]
impl TechnicianRepository for MockTechnicianRepository {
    async fn list_active(&self) -> Result<Vec<Technician>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().filter(|t| t.is_active).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Technician>> {
        let rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        Ok(rows.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, mut technician: Technician) -> Result<Technician> {
        technician.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().map_err(|_| lock_poisoned())?.push(technician.clone());
        Ok(technician)
    }

    async fn update(&self, technician: Technician) -> Result<Technician> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        let row = rows
            .iter_mut()
            .find(|t| t.id == technician.id)
            .ok_or_else(|| AlarmDeskError::NotFound(format!("technician {}", technician.id)))?;
        *row = technician;
        Ok(row.clone())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().map_err(|_| lock_poisoned())?;
        match rows.iter_mut().find(|t| t.id == id) {
            Some(row) => {
                row.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count_open_work_orders(&self, id: i64) -> Result<i64> {
        let orders = self.open_orders.lock().map_err(|_| lock_poisoned())?;
        Ok(orders.get(&id).copied().unwrap_or(0))
    }
}
