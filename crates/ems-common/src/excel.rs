//! Spreadsheet serial date helpers.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Smallest serial accepted as a date (1954-10-03).
pub const EXCEL_SERIAL_MIN: f64 = 20_000.0;
/// Largest serial accepted as a date (2119-01-10).
pub const EXCEL_SERIAL_MAX: f64 = 80_000.0;

/// Converts a spreadsheet serial (days since 1899-12-30, fraction = time of
/// day) to a naive datetime, rounded to the second.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

/// Like [`excel_serial_to_datetime`] but only for serials inside the
/// plausible incident-date window.
pub fn plausible_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if (EXCEL_SERIAL_MIN..=EXCEL_SERIAL_MAX).contains(&serial) {
        excel_serial_to_datetime(serial)
    } else {
        None
    }
}
