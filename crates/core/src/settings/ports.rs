//! Port interfaces for settings and lookup-table management
//!
//! The seven homogeneous lookup tables share one table-driven port keyed by
//! [`LookupKind`]; panel types and work-order statuses have their own shapes.
//! Every port exposes the reference count its delete guard needs.

use async_trait::async_trait;
use alarmdesk_domain::{
    Communicator, LookupEntry, LookupKind, PanelType, Result, Technician, WorkOrderStatus,
};

/// Persistence for the homogeneous lookup tables
#[async_trait]
pub trait LookupRepository: Send + Sync {
    /// Active entries of one kind, ordered by name
    async fn list_active(&self, kind: LookupKind) -> Result<Vec<LookupEntry>>;

    async fn find_by_id(&self, kind: LookupKind, id: i64) -> Result<Option<LookupEntry>>;

    async fn insert(&self, kind: LookupKind, entry: LookupEntry) -> Result<LookupEntry>;

    async fn update(&self, kind: LookupKind, entry: LookupEntry) -> Result<LookupEntry>;

    async fn soft_delete(&self, kind: LookupKind, id: i64) -> Result<bool>;

    /// Number of active rows in the dependent table(s) referencing this entry
    async fn count_active_references(&self, kind: LookupKind, id: i64) -> Result<i64>;
}

/// Persistence for panel types
#[async_trait]
pub trait PanelTypeRepository: Send + Sync {
    /// Active panel types ordered by manufacturer then model
    async fn list_active(&self) -> Result<Vec<PanelType>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PanelType>>;

    async fn insert(&self, panel_type: PanelType) -> Result<PanelType>;

    async fn update(&self, panel_type: PanelType) -> Result<PanelType>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;

    /// Active security systems using this panel type
    async fn count_active_references(&self, id: i64) -> Result<i64>;
}

/// Persistence for work-order statuses
#[async_trait]
pub trait WorkOrderStatusRepository: Send + Sync {
    /// Active statuses in sort order
    async fn list_active(&self) -> Result<Vec<WorkOrderStatus>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkOrderStatus>>;

    async fn insert(&self, status: WorkOrderStatus) -> Result<WorkOrderStatus>;

    async fn update(&self, status: WorkOrderStatus) -> Result<WorkOrderStatus>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;

    /// Active work orders in this status
    async fn count_active_references(&self, id: i64) -> Result<i64>;
}

/// Persistence for communicators
#[async_trait]
pub trait CommunicatorRepository: Send + Sync {
    /// Active communicators ordered by type, manufacturer and model
    async fn list_active(&self) -> Result<Vec<Communicator>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Communicator>>;

    async fn insert(&self, communicator: Communicator) -> Result<Communicator>;

    async fn update(&self, communicator: Communicator) -> Result<Communicator>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;

    /// Active security systems using this communicator as primary or
    /// secondary path
    async fn count_active_system_references(&self, id: i64) -> Result<i64>;
}

/// Persistence for technicians
#[async_trait]
pub trait TechnicianRepository: Send + Sync {
    /// Active technicians ordered by last then first name
    async fn list_active(&self) -> Result<Vec<Technician>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Technician>>;

    async fn insert(&self, technician: Technician) -> Result<Technician>;

    async fn update(&self, technician: Technician) -> Result<Technician>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;

    /// Active work orders assigned to this technician that are neither
    /// completed nor canceled
    async fn count_open_work_orders(&self, id: i64) -> Result<i64>;
}
