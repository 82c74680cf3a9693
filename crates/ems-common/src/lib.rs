//! Shared utilities for the Fire-EMS data formatter crates.
//!
//! This crate holds the Polars `AnyValue` helpers, spreadsheet date
//! conversion and log redaction shared across the workspace.

pub mod excel;
pub mod polars;
pub mod redact;

// Re-export commonly used functions at crate root for convenience
pub use excel::{excel_serial_to_datetime, plausible_excel_serial};
pub use polars::{
    any_to_string, any_to_string_non_empty, column_strings, format_numeric,
    parse_f64, parse_i64, string_frame,
};
pub use redact::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data};
