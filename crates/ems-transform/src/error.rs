//! Error types for value transformation and output.

use std::path::PathBuf;

use ems_map::MappingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// A value failed to convert in strict mode.
    #[error("row {row}: field '{field}' could not convert '{value}': {message}")]
    Value {
        field: String,
        row: usize,
        value: String,
        message: String,
    },

    #[error("unknown time zone '{name}'; use an IANA name such as America/Chicago or an offset such as -05:00")]
    Timezone { name: String },

    #[error("invalid regex '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A transform's parameters cannot be used.
    #[error("invalid {rule} transform: {message}")]
    InvalidRule { rule: &'static str, message: String },

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
