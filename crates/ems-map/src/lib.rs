//! Source column to standardized field mapping.
//!
//! [`FieldMapper`] resolves each upload column against a [`FieldSchema`]
//! (explicit spec mapping, field name or alias, dotted path, normalized
//! name) and reports unmapped columns, missing required fields and fuzzy
//! suggestions.
//!
//! [`FieldSchema`]: ems_model::FieldSchema

#![deny(unsafe_code)]

mod error;
mod mapper;
mod normalize;
mod suggest;

pub use error::{MappingError, Result};
pub use mapper::FieldMapper;
pub use normalize::{dotted_candidates, normalize_name, normalize_text};
pub use suggest::DEFAULT_SUGGESTION_THRESHOLD;
