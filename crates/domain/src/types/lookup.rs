//! Lookup/reference table types
//!
//! Most lookup tables share one shape (name + description + active flag), so
//! they are represented by a single [`LookupEntry`] type addressed through a
//! [`LookupKind`]. Panel types and work-order statuses carry extra columns
//! and get their own types.

use serde::{Deserialize, Serialize};

/// A row in one of the homogeneous lookup tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// The homogeneous lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    CustomerType,
    ContactType,
    MonitoringType,
    DeviceType,
    CommunicatorType,
    WorkOrderType,
    WorkOrderCategory,
}

impl LookupKind {
    /// Every homogeneous lookup kind
    pub const ALL: [Self; 7] = [
        Self::CustomerType,
        Self::ContactType,
        Self::MonitoringType,
        Self::DeviceType,
        Self::CommunicatorType,
        Self::WorkOrderType,
        Self::WorkOrderCategory,
    ];

    /// Human-readable singular label, used in error messages
    pub fn label(self) -> &'static str {
        match self {
            Self::CustomerType => "customer type",
            Self::ContactType => "contact type",
            Self::MonitoringType => "monitoring type",
            Self::DeviceType => "device type",
            Self::CommunicatorType => "communicator type",
            Self::WorkOrderType => "work order type",
            Self::WorkOrderCategory => "work order category",
        }
    }

    /// The entity type that holds foreign keys into this lookup table,
    /// named the way a delete-rejection message should read
    pub fn referenced_by(self) -> &'static str {
        match self {
            Self::CustomerType => "customers",
            Self::ContactType => "contacts",
            Self::MonitoringType => "security systems",
            Self::DeviceType => "zones",
            Self::CommunicatorType => "communicators",
            Self::WorkOrderType | Self::WorkOrderCategory => "work orders",
        }
    }
}

/// An alarm-panel model (manufacturer + model instead of a single name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelType {
    pub id: i64,
    pub manufacturer: String,
    pub model_number: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl PanelType {
    /// "Manufacturer Model" for display
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model_number)
    }
}

/// A work-order status row (adds UI color and ordering)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderStatus {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color_code: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}
