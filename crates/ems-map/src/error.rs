//! Error types for mapping operations.

use ems_model::ModelError;
use thiserror::Error;

/// Errors raised while preparing a mapper from a format spec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    /// A mapping, split or combine rule names a field the schema lacks.
    #[error("'{source_column}' targets unknown field '{target}'")]
    UnknownTarget {
        source_column: String,
        target: String,
    },

    /// Two rules produce the same field.
    #[error("field '{target}' is produced by both '{first}' and '{second}'")]
    TargetConflict {
        target: String,
        first: String,
        second: String,
    },

    #[error("invalid format spec: {0}")]
    InvalidSpec(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MappingError>;
