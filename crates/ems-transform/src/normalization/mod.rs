//! Normalization functions for incident data.
//!
//! - **datetime**: date, time and UTC timestamp parsing
//! - **numeric**: number and integer conversion
//! - **text**: whitespace, case and boolean normalization
//! - **coordinate**: latitude/longitude parsing

pub mod coordinate;
pub mod datetime;
pub mod numeric;
pub mod text;

pub use coordinate::{format_coordinate, parse_coordinate, transform_to_coordinate};
pub use datetime::{
    DATE_FORMATS, DATETIME_FORMATS, TIME_FORMATS, format_date, format_time, format_utc,
    parse_date, parse_datetime_utc, parse_naive_datetime, parse_time, parse_with_offset,
};
pub use numeric::{parse_number, transform_to_integer, transform_to_numeric};
pub use text::{normalize_text, parse_boolean};
