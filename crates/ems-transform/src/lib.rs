//! Incident data transformation.
//!
//! This crate turns an ingested upload into standardized records:
//!
//! - **normalization**: date, time, number, text, boolean and coordinate parsing
//! - **timezone**: source time zones and UTC conversion
//! - **rules**: compiled transform chains
//! - **combine**: date + time column merging
//! - **formatter**: mapping, conversion, defaults and report assembly
//! - **output**: CSV and JSON writers

#![deny(unsafe_code)]

pub mod combine;
pub mod error;
pub mod formatter;
pub mod inference;
pub mod normalization;
pub mod output;
pub mod rules;
pub mod timezone;

pub use combine::{CombineFailure, combine_date_time};
pub use error::{Result, TransformError};
pub use formatter::{FormatOutcome, Formatter};
pub use inference::{infer_axis, infer_rule};
pub use output::{
    OutputFormat, frame_to_records, write_csv, write_csv_to, write_json, write_json_to,
    write_output,
};
pub use rules::{CompiledRule, RuleContext, apply_chain, compile_chain};
pub use timezone::SourceTimezone;
