//! Customer aggregate: accounts, contacts, security systems, zones and call
//! lists

pub mod ports;
pub mod service;

pub use service::CustomerService;
