//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Prefix on every generated work-order number (`WO2024-0001`)
pub const WORK_ORDER_NUMBER_PREFIX: &str = "WO";

/// Zero-pad width of the numeric work-order suffix
pub const WORK_ORDER_NUMBER_PAD: usize = 4;

/// Timestamp layout used for fallback work-order numbers
pub const WORK_ORDER_FALLBACK_FORMAT: &str = "%Y%m%d%H%M%S";

/// Storage layout for calendar dates (`scheduled_date`, permit dates, ...)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage layout for times of day (`scheduled_start_time`, ...)
pub const TIME_FORMAT: &str = "%H:%M";

// Field length limits (mirrored by the schema)
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_NOTES_LENGTH: usize = 1000;
