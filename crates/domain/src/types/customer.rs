//! Customer aggregate types

use serde::{Deserialize, Serialize};

/// A customer account
///
/// Residential customers carry first/last name only; commercial accounts add
/// a company name. `linked_customer_id` chains related accounts (for example
/// a property owner and the managing company).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub company_name: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub county: Option<String>,
    pub email_address: Option<String>,
    pub home_phone: Option<String>,
    pub business_phone: Option<String>,
    pub cell_phone: Option<String>,
    pub customer_type_id: i64,
    pub linked_customer_id: Option<i64>,
    pub created_at: i64,
    pub modified_at: Option<i64>,
    pub is_active: bool,
}

impl Customer {
    /// Name shown in lists: the company name when present, otherwise
    /// "Last, First"
    pub fn display_name(&self) -> String {
        match &self.company_name {
            Some(company) if !company.trim().is_empty() => company.clone(),
            _ => format!("{}, {}", self.last_name, self.first_name),
        }
    }
}

/// A contact person attached to a customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub customer_id: i64,
    pub name: String,
    pub home_phone: Option<String>,
    pub business_phone: Option<String>,
    pub cell_phone: Option<String>,
    pub email_address: Option<String>,
    pub contact_type_id: i64,
    pub created_at: i64,
    pub is_active: bool,
}
