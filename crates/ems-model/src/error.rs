use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("schema '{schema}' defines no fields")]
    EmptySchema { schema: String },
    #[error("field name must not be empty")]
    EmptyFieldName,
    #[error("duplicate field '{name}' in schema '{schema}'")]
    DuplicateField { schema: String, name: String },
    #[error("split rule for '{source_column}' has no targets")]
    EmptySplitTargets { source_column: String },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
