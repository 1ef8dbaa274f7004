//! Security-system aggregate types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An installed security system at a customer site
///
/// Panel, monitoring and communicator references are optional: a system is
/// often recorded before the panel type is confirmed or monitoring starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySystem {
    pub id: i64,
    pub customer_id: i64,
    pub central_station_number: Option<String>,
    pub panel_type_id: Option<i64>,
    pub monitoring_type_id: Option<i64>,
    pub monitoring_start_date: Option<NaiveDate>,
    pub installed_date: Option<NaiveDate>,
    pub master_security_code: Option<String>,
    pub code_word: Option<String>,
    pub police_phone: Option<String>,
    pub fire_dept_phone: Option<String>,
    pub ambulance_phone: Option<String>,
    pub city_permit_number: Option<String>,
    pub permit_due_date: Option<NaiveDate>,
    pub authority_notes: Option<String>,
    pub primary_communicator_id: Option<i64>,
    pub secondary_communicator_id: Option<i64>,
    pub created_at: i64,
    pub modified_at: Option<i64>,
    pub is_active: bool,
}

/// A protection zone on a security system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub security_system_id: i64,
    pub zone_number: i32,
    pub signal: Option<String>,
    pub description: String,
    pub device_type_id: Option<i64>,
    pub wireless_id: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
}

/// A person the central station calls on alarm, in priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallListEntry {
    pub id: i64,
    pub security_system_id: i64,
    pub priority: i32,
    pub name: String,
    pub phone_number: String,
    pub notes: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
}

/// An alarm communicator (cellular, radio, IP or POTS path)
///
/// Shared inventory: one communicator row can serve as the primary path on
/// one system and the secondary on another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Communicator {
    pub id: i64,
    pub communicator_type_id: i64,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub radio_id: Option<String>,
    pub ip_address: Option<String>,
    pub gateway: Option<String>,
    pub subnet: Option<String>,
    pub phone_number_1: Option<String>,
    pub phone_number_2: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
}
