//! Row-mapping and error-mapping helpers shared by the SQLite repositories.
//!
//! SQLite stores booleans as integers, calendar dates as `YYYY-MM-DD` text
//! and times of day as `HH:MM` text; these helpers keep the conversions in
//! one place so every repository reads and writes the same representation.

use alarmdesk_common::storage::StorageError;
use alarmdesk_domain::constants::{DATE_FORMAT, TIME_FORMAT};
use alarmdesk_domain::AlarmDeskError;
use chrono::{NaiveDate, NaiveTime};
use tokio::task::JoinError;

use crate::errors::InfraError;

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}

pub(crate) fn date_to_sql(value: Option<NaiveDate>) -> Option<String> {
    value.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Parse a stored date column; malformed text reads as absent rather than
/// failing the whole row.
pub(crate) fn date_from_sql(value: Option<String>) -> Option<NaiveDate> {
    value.and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok())
}

pub(crate) fn time_to_sql(value: Option<NaiveTime>) -> Option<String> {
    value.map(|t| t.format(TIME_FORMAT).to_string())
}

pub(crate) fn time_from_sql(value: Option<String>) -> Option<NaiveTime> {
    value.and_then(|s| NaiveTime::parse_from_str(&s, TIME_FORMAT).ok())
}

pub(crate) fn map_storage_error(err: StorageError) -> AlarmDeskError {
    AlarmDeskError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: JoinError) -> AlarmDeskError {
    AlarmDeskError::Internal(format!("Task join error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_round_trip() {
        assert_eq!(bool_to_int(true), 1);
        assert_eq!(bool_to_int(false), 0);
        assert!(int_to_bool(1));
        assert!(!int_to_bool(0));
    }

    #[test]
    fn dates_round_trip_and_tolerate_garbage() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10);
        assert_eq!(date_to_sql(date), Some("2024-06-10".to_string()));
        assert_eq!(date_from_sql(Some("2024-06-10".into())), date);
        assert_eq!(date_from_sql(Some("junk".into())), None);
        assert_eq!(date_from_sql(None), None);
    }

    #[test]
    fn times_round_trip() {
        let time = NaiveTime::from_hms_opt(9, 30, 0);
        assert_eq!(time_to_sql(time), Some("09:30".to_string()));
        assert_eq!(time_from_sql(Some("09:30".into())), time);
        assert_eq!(time_from_sql(Some("not a time".into())), None);
    }
}
