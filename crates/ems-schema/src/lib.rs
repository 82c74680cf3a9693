//! Field schema loading.
//!
//! Schemas are JSON documents listing required and optional fields with
//! their target types, aliases and defaults. A standard incident schema is
//! embedded for use when no file is given.

#![deny(unsafe_code)]

pub mod embedded;
pub mod error;
pub mod loader;

pub use crate::error::{Result, SchemaError};
pub use crate::loader::{
    SCHEMA_ENV_VAR, default_schema, load_schema, parse_schema, resolve_schema,
    schema_path_from_env,
};
