//! Embedded schema data.
//!
//! The default incident schema is embedded at compile time using
//! `include_str!()` so the formatter works without any files on disk.

/// Standard fire/EMS incident schema.
pub const INCIDENT_SCHEMA: &str = include_str!("../data/incident_schema.json");
