//! Per-format readers producing a [`RawTable`](crate::table::RawTable).

pub(crate) mod csv;
pub(crate) mod excel;
pub(crate) mod json;
pub(crate) mod xml;

pub use json::RECORD_KEYS;
