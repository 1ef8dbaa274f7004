//! Work-order service - core business logic
//!
//! Lifecycle: orders are created Unscheduled, move to Scheduled once
//! dispatch assigns a date, then InProgress / Pending, and end Completed or
//! Canceled. Rows are soft-deleted, never removed.

use std::sync::Arc;

use alarmdesk_common::validation::ValidationError;
use alarmdesk_domain::constants::{
    WORK_ORDER_FALLBACK_FORMAT, WORK_ORDER_NUMBER_PAD, WORK_ORDER_NUMBER_PREFIX,
};
use alarmdesk_domain::{AlarmDeskError, Result, WorkOrder, WorkOrderItem, WorkOrderStatusCode};
use chrono::{Datelike, NaiveDate, Utc};
use tracing::{error, info};

use super::ports::{WorkOrderItemRepository, WorkOrderRepository};

/// Work-order service
pub struct WorkOrderService {
    orders: Arc<dyn WorkOrderRepository>,
    items: Arc<dyn WorkOrderItemRepository>,
}

impl WorkOrderService {
    /// Create a new work-order service
    pub fn new(orders: Arc<dyn WorkOrderRepository>, items: Arc<dyn WorkOrderItemRepository>) -> Self {
        Self { orders, items }
    }

    /// All active work orders, newest first
    pub async fn list_work_orders(&self) -> Result<Vec<WorkOrder>> {
        self.orders.list_active().await
    }

    /// Fetch one work order by id (soft-deleted rows included, for history)
    pub async fn get_work_order(&self, id: i64) -> Result<Option<WorkOrder>> {
        self.orders.find_by_id(id).await
    }

    /// Fetch an active work order by its number
    pub async fn get_work_order_by_number(&self, number: &str) -> Result<Option<WorkOrder>> {
        self.orders.find_by_number(number).await
    }

    /// Create a work order
    ///
    /// Assigns a generated number when the caller left it blank and defaults
    /// the status to Unscheduled when unset.
    pub async fn create_work_order(&self, mut order: WorkOrder) -> Result<WorkOrder> {
        validate_work_order(&order)?;

        if order.number.trim().is_empty() {
            order.number = self.generate_work_order_number().await;
        }
        if order.status_id <= 0 {
            order.status_id = WorkOrderStatusCode::Unscheduled.as_id();
        }

        order.created_at = Utc::now().timestamp();
        order.modified_at = None;
        order.is_active = true;

        let stored = self.orders.insert(order).await?;
        info!(work_order_id = stored.id, number = %stored.number, "work order created");
        Ok(stored)
    }

    /// Update a work order's editable fields
    ///
    /// The number is immutable once assigned; the repository update leaves
    /// that column alone regardless of what the caller passes.
    pub async fn update_work_order(&self, mut order: WorkOrder) -> Result<WorkOrder> {
        validate_work_order(&order)?;

        if self.orders.find_by_id(order.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("work order {}", order.id)));
        }

        order.modified_at = Some(Utc::now().timestamp());
        self.orders.update(order).await
    }

    /// Soft-delete a work order
    pub async fn delete_work_order(&self, id: i64) -> Result<()> {
        if !self.orders.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("work order {id}")));
        }
        info!(work_order_id = id, "work order deleted");
        Ok(())
    }

    /// Search active work orders; a blank term lists everything
    pub async fn search_work_orders(&self, term: &str) -> Result<Vec<WorkOrder>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_work_orders().await;
        }
        self.orders.search(&term.to_lowercase()).await
    }

    /// Active orders for one customer
    pub async fn work_orders_for_customer(&self, customer_id: i64) -> Result<Vec<WorkOrder>> {
        self.orders.list_by_customer(customer_id).await
    }

    /// Active orders assigned to one technician
    pub async fn work_orders_for_technician(&self, technician_id: i64) -> Result<Vec<WorkOrder>> {
        self.orders.list_by_technician(technician_id).await
    }

    /// Active orders in one status
    pub async fn work_orders_by_status(&self, status_id: i64) -> Result<Vec<WorkOrder>> {
        self.orders.list_by_status(status_id).await
    }

    /// Active orders scheduled in the inclusive date range
    pub async fn work_orders_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkOrder>> {
        self.orders.list_scheduled_between(start, end).await
    }

    /// Active orders scheduled on one day
    pub async fn work_orders_scheduled_on(&self, date: NaiveDate) -> Result<Vec<WorkOrder>> {
        self.orders.list_scheduled_on(date).await
    }

    /// Generate the next work-order number for the current year
    ///
    /// Numbers look like `WO2024-0038`: year prefix, then a zero-padded
    /// sequence restarted each January. The read-then-increment here is not
    /// atomic — two sessions generating at the same instant can mint the same
    /// number, and the unique index on the column turns the second insert
    /// into an error. When the lookup itself fails, a timestamp-based number
    /// keeps order creation available.
    pub async fn generate_work_order_number(&self) -> String {
        let now = Utc::now();
        let prefix = format!("{}{}", WORK_ORDER_NUMBER_PREFIX, now.year());

        match self.orders.last_number_with_prefix(&prefix).await {
            Ok(Some(last)) => next_in_sequence(&prefix, &last),
            Ok(None) => first_in_sequence(&prefix),
            Err(err) => {
                error!(error = %err, "work order number lookup failed, using timestamp fallback");
                format!("{}{}", WORK_ORDER_NUMBER_PREFIX, now.format(WORK_ORDER_FALLBACK_FORMAT))
            }
        }
    }

    // ---------------------------------------------------------------- items

    /// Active line items on one work order
    pub async fn items_for_work_order(&self, work_order_id: i64) -> Result<Vec<WorkOrderItem>> {
        self.items.list_for_order(work_order_id).await
    }

    /// Add a line item to a work order
    pub async fn add_item(&self, mut item: WorkOrderItem) -> Result<WorkOrderItem> {
        validate_item(&item)?;

        item.created_at = Utc::now().timestamp();
        item.is_active = true;
        self.items.insert(item).await
    }

    /// Update a line item
    pub async fn update_item(&self, item: WorkOrderItem) -> Result<WorkOrderItem> {
        validate_item(&item)?;

        if self.items.find_by_id(item.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("work order item {}", item.id)));
        }
        self.items.update(item).await
    }

    /// Soft-delete a line item
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        if !self.items.soft_delete(id).await? {
            return Err(AlarmDeskError::NotFound(format!("work order item {id}")));
        }
        Ok(())
    }
}

/// First number of a year's sequence
fn first_in_sequence(prefix: &str) -> String {
    format!("{}-{:0width$}", prefix, 1, width = WORK_ORDER_NUMBER_PAD)
}

/// Increment the numeric suffix of the highest assigned number
///
/// An unparseable suffix restarts the sequence instead of failing.
fn next_in_sequence(prefix: &str, last: &str) -> String {
    let suffix = last.get(prefix.len() + 1..).unwrap_or("");
    match suffix.parse::<u32>() {
        Ok(n) => format!("{}-{:0width$}", prefix, n + 1, width = WORK_ORDER_NUMBER_PAD),
        Err(_) => first_in_sequence(prefix),
    }
}

fn validate_work_order(order: &WorkOrder) -> Result<()> {
    let mut check = ValidationError::new();
    if order.customer_id <= 0 {
        check.add_field_error("customer_id", "is required");
    }
    check.require("description", &order.description);
    if order.work_order_type_id <= 0 {
        check.add_field_error("work_order_type_id", "is required");
    }
    if order.category_id <= 0 {
        check.add_field_error("category_id", "is required");
    }
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_item(item: &WorkOrderItem) -> Result<()> {
    let mut check = ValidationError::new();
    if item.work_order_id <= 0 {
        check.add_field_error("work_order_id", "is required");
    }
    check.require("description", &item.description);
    if item.quantity <= 0.0 {
        check.add_field_error("quantity", "must be positive");
    }
    if item.unit_price < 0.0 {
        check.add_field_error("unit_price", "must not be negative");
    }
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_one() {
        assert_eq!(first_in_sequence("WO2024"), "WO2024-0001");
    }

    #[test]
    fn sequence_increments_and_repads() {
        assert_eq!(next_in_sequence("WO2024", "WO2024-0037"), "WO2024-0038");
        assert_eq!(next_in_sequence("WO2024", "WO2024-0999"), "WO2024-1000");
    }

    #[test]
    fn garbage_suffix_restarts_the_sequence() {
        assert_eq!(next_in_sequence("WO2024", "WO2024-XYZ"), "WO2024-0001");
        assert_eq!(next_in_sequence("WO2024", "WO2024"), "WO2024-0001");
    }
}
