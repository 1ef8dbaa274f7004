//! Port interfaces for the work-order aggregate

use async_trait::async_trait;
use alarmdesk_domain::{Result, WorkOrder, WorkOrderItem};
use chrono::NaiveDate;

/// Persistence for work orders
#[async_trait]
pub trait WorkOrderRepository: Send + Sync {
    /// Active work orders, newest first
    async fn list_active(&self) -> Result<Vec<WorkOrder>>;

    /// Fetch by id regardless of active flag
    async fn find_by_id(&self, id: i64) -> Result<Option<WorkOrder>>;

    /// Fetch an active work order by its human-readable number
    async fn find_by_number(&self, number: &str) -> Result<Option<WorkOrder>>;

    /// Case-insensitive search across number, description, notes and the
    /// customer's name or company; active rows only
    async fn search(&self, term: &str) -> Result<Vec<WorkOrder>>;

    /// Active orders for one customer, newest first
    async fn list_by_customer(&self, customer_id: i64) -> Result<Vec<WorkOrder>>;

    /// Active orders assigned to one technician, by schedule
    async fn list_by_technician(&self, technician_id: i64) -> Result<Vec<WorkOrder>>;

    /// Active orders in one status, newest first
    async fn list_by_status(&self, status_id: i64) -> Result<Vec<WorkOrder>>;

    /// Active orders scheduled within the inclusive date range
    async fn list_scheduled_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkOrder>>;

    /// Active orders scheduled on one day, by start time
    async fn list_scheduled_on(&self, date: NaiveDate) -> Result<Vec<WorkOrder>>;

    /// Highest assigned number starting with `prefix`, if any
    ///
    /// Lexicographic max works because the numeric suffix is zero-padded.
    async fn last_number_with_prefix(&self, prefix: &str) -> Result<Option<String>>;

    /// Insert and return the stored row with its assigned id
    async fn insert(&self, order: WorkOrder) -> Result<WorkOrder>;

    /// Update the editable columns; the work-order number is never touched
    async fn update(&self, order: WorkOrder) -> Result<WorkOrder>;

    /// Flip the active flag; false when no such row exists
    async fn soft_delete(&self, id: i64) -> Result<bool>;
}

/// Persistence for work-order line items
#[async_trait]
pub trait WorkOrderItemRepository: Send + Sync {
    /// Active items on one work order, oldest first
    async fn list_for_order(&self, work_order_id: i64) -> Result<Vec<WorkOrderItem>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<WorkOrderItem>>;

    async fn insert(&self, item: WorkOrderItem) -> Result<WorkOrderItem>;

    async fn update(&self, item: WorkOrderItem) -> Result<WorkOrderItem>;

    async fn soft_delete(&self, id: i64) -> Result<bool>;
}
