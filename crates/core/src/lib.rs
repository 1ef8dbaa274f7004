//! # AlarmDesk Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the persistence layer
//! - The aggregate services (customers, work orders, settings)
//! - Validation and work-order numbering rules
//!
//! ## Architecture Principles
//! - Only depends on `alarmdesk-common` and `alarmdesk-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod customers;
pub mod settings;
pub mod work_orders;

// Re-export specific items to avoid ambiguity
pub use customers::ports::{
    CallListRepository, ContactRepository, CustomerRepository, SecuritySystemRepository,
    ZoneRepository,
};
pub use customers::CustomerService;
pub use settings::ports::{
    CommunicatorRepository, LookupRepository, PanelTypeRepository, TechnicianRepository,
    WorkOrderStatusRepository,
};
pub use settings::SettingsService;
pub use work_orders::ports::{WorkOrderItemRepository, WorkOrderRepository};
pub use work_orders::WorkOrderService;
