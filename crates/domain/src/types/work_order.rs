//! Work-order aggregate types

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A field technician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technician {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub cell_phone: Option<String>,
    pub employee_number: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub specializations: Option<String>,
    pub certifications: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
}

impl Technician {
    /// "First Last" for display
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A work order
///
/// `number` is unique and immutable once assigned; updates never touch it.
/// The schedule is optional until dispatch assigns a date and time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: i64,
    pub number: String,
    pub customer_id: i64,
    pub description: String,
    pub work_order_type_id: i64,
    pub category_id: i64,
    pub status_id: i64,
    pub technician_id: Option<i64>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_start_time: Option<NaiveTime>,
    pub scheduled_end_time: Option<NaiveTime>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub completed_at: Option<i64>,
    pub notes: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub created_by: String,
    pub created_at: i64,
    pub modified_at: Option<i64>,
    pub is_active: bool,
}

/// A billable line item on a work order
///
/// The line total is computed, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrderItem {
    pub id: i64,
    pub work_order_id: i64,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub part_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
}

impl WorkOrderItem {
    /// quantity × unit price
    pub fn total_price(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Well-known work-order statuses, matching the seeded status rows
///
/// Lifecycle: Unscheduled → Scheduled → InProgress → Pending ↔ InProgress →
/// Completed or Canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatusCode {
    Unscheduled,
    Scheduled,
    InProgress,
    Pending,
    Canceled,
    Completed,
}

impl WorkOrderStatusCode {
    /// Row id of the seeded status
    pub fn as_id(self) -> i64 {
        match self {
            Self::Unscheduled => 1,
            Self::Scheduled => 2,
            Self::InProgress => 3,
            Self::Pending => 4,
            Self::Canceled => 5,
            Self::Completed => 6,
        }
    }

    /// Map a seeded status row id back to the code
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(Self::Unscheduled),
            2 => Some(Self::Scheduled),
            3 => Some(Self::InProgress),
            4 => Some(Self::Pending),
            5 => Some(Self::Canceled),
            6 => Some(Self::Completed),
            _ => None,
        }
    }

    /// True while the order still represents outstanding work
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Completed | Self::Canceled)
    }
}
