//! Settings service - lookup-table and reference-data management
//!
//! One generic CRUD path covers the seven homogeneous lookup tables; panel
//! types, statuses, communicators and technicians follow the same pattern
//! with their own shapes. Every delete runs a referential guard first: a
//! lookup row that active data still points at cannot be deactivated.

use std::sync::Arc;

use alarmdesk_common::validation::ValidationError;
use alarmdesk_domain::{
    AlarmDeskError, Communicator, LookupEntry, LookupKind, PanelType, Result, Technician,
    WorkOrderStatus,
};
use chrono::Utc;
use tracing::info;

use super::ports::{
    CommunicatorRepository, LookupRepository, PanelTypeRepository, TechnicianRepository,
    WorkOrderStatusRepository,
};

/// Settings service
pub struct SettingsService {
    lookups: Arc<dyn LookupRepository>,
    panel_types: Arc<dyn PanelTypeRepository>,
    statuses: Arc<dyn WorkOrderStatusRepository>,
    communicators: Arc<dyn CommunicatorRepository>,
    technicians: Arc<dyn TechnicianRepository>,
}

impl SettingsService {
    /// Create a new settings service
    pub fn new(
        lookups: Arc<dyn LookupRepository>,
        panel_types: Arc<dyn PanelTypeRepository>,
        statuses: Arc<dyn WorkOrderStatusRepository>,
        communicators: Arc<dyn CommunicatorRepository>,
        technicians: Arc<dyn TechnicianRepository>,
    ) -> Self {
        Self { lookups, panel_types, statuses, communicators, technicians }
    }

    // ------------------------------------------------------- generic lookups

    /// Active entries of one lookup kind
    pub async fn lookup_entries(&self, kind: LookupKind) -> Result<Vec<LookupEntry>> {
        self.lookups.list_active(kind).await
    }

    /// Add a lookup entry
    pub async fn add_lookup_entry(
        &self,
        kind: LookupKind,
        mut entry: LookupEntry,
    ) -> Result<LookupEntry> {
        validate_lookup_entry(&entry)?;

        entry.is_active = true;
        self.lookups.insert(kind, entry).await
    }

    /// Update a lookup entry
    pub async fn update_lookup_entry(
        &self,
        kind: LookupKind,
        entry: LookupEntry,
    ) -> Result<LookupEntry> {
        validate_lookup_entry(&entry)?;

        if self.lookups.find_by_id(kind, entry.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("{} {}", kind.label(), entry.id)));
        }
        self.lookups.update(kind, entry).await
    }

    /// Soft-delete a lookup entry unless live data still references it
    pub async fn delete_lookup_entry(&self, kind: LookupKind, id: i64) -> Result<()> {
        if self.lookups.find_by_id(kind, id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("{} {}", kind.label(), id)));
        }

        let references = self.lookups.count_active_references(kind, id).await?;
        if references > 0 {
            return Err(AlarmDeskError::InUse(format!(
                "cannot delete {} because it is being used by {}",
                kind.label(),
                kind.referenced_by()
            )));
        }

        self.lookups.soft_delete(kind, id).await?;
        info!(kind = kind.label(), id, "lookup entry deleted");
        Ok(())
    }

    // ---------------------------------------------------------- panel types

    /// Active panel types
    pub async fn panel_types(&self) -> Result<Vec<PanelType>> {
        self.panel_types.list_active().await
    }

    /// Add a panel type
    pub async fn add_panel_type(&self, mut panel_type: PanelType) -> Result<PanelType> {
        validate_panel_type(&panel_type)?;

        panel_type.is_active = true;
        self.panel_types.insert(panel_type).await
    }

    /// Update a panel type
    pub async fn update_panel_type(&self, panel_type: PanelType) -> Result<PanelType> {
        validate_panel_type(&panel_type)?;

        if self.panel_types.find_by_id(panel_type.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("panel type {}", panel_type.id)));
        }
        self.panel_types.update(panel_type).await
    }

    /// Soft-delete a panel type unless a security system still uses it
    pub async fn delete_panel_type(&self, id: i64) -> Result<()> {
        if self.panel_types.find_by_id(id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("panel type {id}")));
        }

        if self.panel_types.count_active_references(id).await? > 0 {
            return Err(AlarmDeskError::InUse(
                "cannot delete panel type because it is being used by security systems".into(),
            ));
        }

        self.panel_types.soft_delete(id).await?;
        Ok(())
    }

    // ------------------------------------------------------------- statuses

    /// Active work-order statuses in sort order
    pub async fn work_order_statuses(&self) -> Result<Vec<WorkOrderStatus>> {
        self.statuses.list_active().await
    }

    /// Add a work-order status
    pub async fn add_work_order_status(&self, mut status: WorkOrderStatus) -> Result<WorkOrderStatus> {
        validate_status(&status)?;

        status.is_active = true;
        self.statuses.insert(status).await
    }

    /// Update a work-order status
    pub async fn update_work_order_status(&self, status: WorkOrderStatus) -> Result<WorkOrderStatus> {
        validate_status(&status)?;

        if self.statuses.find_by_id(status.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("work order status {}", status.id)));
        }
        self.statuses.update(status).await
    }

    /// Soft-delete a status unless an active work order still carries it
    pub async fn delete_work_order_status(&self, id: i64) -> Result<()> {
        if self.statuses.find_by_id(id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("work order status {id}")));
        }

        if self.statuses.count_active_references(id).await? > 0 {
            return Err(AlarmDeskError::InUse(
                "cannot delete work order status because it is being used by work orders".into(),
            ));
        }

        self.statuses.soft_delete(id).await?;
        Ok(())
    }

    // -------------------------------------------------------- communicators

    /// Active communicators
    pub async fn communicators(&self) -> Result<Vec<Communicator>> {
        self.communicators.list_active().await
    }

    /// Add a communicator to inventory
    pub async fn add_communicator(&self, mut communicator: Communicator) -> Result<Communicator> {
        validate_communicator(&communicator)?;

        communicator.created_at = Utc::now().timestamp();
        communicator.is_active = true;
        self.communicators.insert(communicator).await
    }

    /// Update a communicator
    pub async fn update_communicator(&self, communicator: Communicator) -> Result<Communicator> {
        validate_communicator(&communicator)?;

        if self.communicators.find_by_id(communicator.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("communicator {}", communicator.id)));
        }
        self.communicators.update(communicator).await
    }

    /// Soft-delete a communicator unless a security system still uses it as
    /// its primary or secondary path
    pub async fn delete_communicator(&self, id: i64) -> Result<()> {
        if self.communicators.find_by_id(id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("communicator {id}")));
        }

        if self.communicators.count_active_system_references(id).await? > 0 {
            return Err(AlarmDeskError::InUse(
                "cannot delete communicator because it is being used by security systems".into(),
            ));
        }

        self.communicators.soft_delete(id).await?;
        Ok(())
    }

    // ---------------------------------------------------------- technicians

    /// Active technicians ordered by name
    pub async fn technicians(&self) -> Result<Vec<Technician>> {
        self.technicians.list_active().await
    }

    /// Fetch one technician by id
    pub async fn get_technician(&self, id: i64) -> Result<Option<Technician>> {
        self.technicians.find_by_id(id).await
    }

    /// Add a technician
    pub async fn add_technician(&self, mut technician: Technician) -> Result<Technician> {
        validate_technician(&technician)?;

        technician.created_at = Utc::now().timestamp();
        technician.is_active = true;
        self.technicians.insert(technician).await
    }

    /// Update a technician
    pub async fn update_technician(&self, technician: Technician) -> Result<Technician> {
        validate_technician(&technician)?;

        if self.technicians.find_by_id(technician.id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("technician {}", technician.id)));
        }
        self.technicians.update(technician).await
    }

    /// Soft-delete a technician unless they still have open work orders
    pub async fn delete_technician(&self, id: i64) -> Result<()> {
        if self.technicians.find_by_id(id).await?.is_none() {
            return Err(AlarmDeskError::NotFound(format!("technician {id}")));
        }

        if self.technicians.count_open_work_orders(id).await? > 0 {
            return Err(AlarmDeskError::InUse(
                "cannot delete technician because they have active work orders".into(),
            ));
        }

        self.technicians.soft_delete(id).await?;
        info!(technician_id = id, "technician deleted");
        Ok(())
    }
}

fn validate_lookup_entry(entry: &LookupEntry) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("name", &entry.name);
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_panel_type(panel_type: &PanelType) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("manufacturer", &panel_type.manufacturer);
    check.require("model_number", &panel_type.model_number);
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_status(status: &WorkOrderStatus) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("name", &status.name);
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_communicator(communicator: &Communicator) -> Result<()> {
    let mut check = ValidationError::new();
    if communicator.communicator_type_id <= 0 {
        check.add_field_error("communicator_type_id", "is required");
    }
    check.check_phone("phone_number_1", communicator.phone_number_1.as_deref());
    check.check_phone("phone_number_2", communicator.phone_number_2.as_deref());
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}

fn validate_technician(technician: &Technician) -> Result<()> {
    let mut check = ValidationError::new();
    check.require("first_name", &technician.first_name);
    check.require("last_name", &technician.last_name);
    check.check_email("email_address", technician.email_address.as_deref());
    check.check_phone("phone_number", technician.phone_number.as_deref());
    check.check_phone("cell_phone", technician.cell_phone.as_deref());
    check.into_result().map_err(|e| AlarmDeskError::InvalidInput(e.to_string()))
}
