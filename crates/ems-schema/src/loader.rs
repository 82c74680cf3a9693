//! Schema loading from JSON files or text.

use std::path::{Path, PathBuf};

use ems_model::FieldSchema;
use tracing::debug;

use crate::embedded::INCIDENT_SCHEMA;
use crate::error::{Result, SchemaError};

/// Environment variable pointing at a schema file that replaces the default.
pub const SCHEMA_ENV_VAR: &str = "EMS_SCHEMA_PATH";

const EMBEDDED_ORIGIN: &str = "<embedded incident schema>";

/// Parses and validates a schema from JSON text.
pub fn parse_schema(json: &str) -> Result<FieldSchema> {
    parse_with_origin(json, "<inline>")
}

/// Reads, parses and validates a schema file.
pub fn load_schema(path: &Path) -> Result<FieldSchema> {
    let text = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let schema = parse_with_origin(&text, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        schema = %schema.name,
        fields = schema.len(),
        "loaded field schema"
    );
    Ok(schema)
}

/// The embedded incident schema.
pub fn default_schema() -> Result<FieldSchema> {
    parse_with_origin(INCIDENT_SCHEMA, EMBEDDED_ORIGIN)
}

/// Schema path from `EMS_SCHEMA_PATH`, if set and non-empty.
pub fn schema_path_from_env() -> Option<PathBuf> {
    std::env::var_os(SCHEMA_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Loads the schema at `path`, else the one named by `EMS_SCHEMA_PATH`,
/// else the embedded default.
pub fn resolve_schema(path: Option<&Path>) -> Result<FieldSchema> {
    match path.map(Path::to_path_buf).or_else(schema_path_from_env) {
        Some(path) => load_schema(&path),
        None => default_schema(),
    }
}

fn parse_with_origin(json: &str, origin: &str) -> Result<FieldSchema> {
    let schema: FieldSchema = serde_json::from_str(json.trim_start_matches('\u{feff}'))
        .map_err(|source| SchemaError::Json {
            origin: origin.to_string(),
            source,
        })?;
    schema.validate().map_err(|source| SchemaError::Invalid {
        origin: origin.to_string(),
        source,
    })?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems_model::FieldType;

    #[test]
    fn embedded_schema_is_valid() {
        let schema = default_schema().unwrap();
        assert_eq!(schema.name, "incident");
        assert!(schema.is_required("incident_id"));
        assert!(schema.is_required("latitude"));
        assert_eq!(
            schema.field("arrival_time").map(|f| f.field_type),
            Some(FieldType::Datetime)
        );
        assert_eq!(
            schema.field("priority").and_then(|f| f.default_text()),
            Some("3".to_string())
        );
    }

    #[test]
    fn parse_rejects_unknown_type() {
        let err = parse_schema(
            r#"{"name": "x", "requiredFields": [{"name": "a", "type": "blob"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Json { .. }));
    }

    #[test]
    fn parse_rejects_empty_schema() {
        let err = parse_schema(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { .. }));
    }

    #[test]
    fn parse_accepts_bom() {
        let schema = parse_schema(
            "\u{feff}{\"name\": \"s\", \"optionalFields\": [{\"name\": \"unit\", \"type\": \"text\"}]}",
        )
        .unwrap();
        assert_eq!(schema.field_names(), vec!["unit"]);
    }
}
