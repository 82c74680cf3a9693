//! Field schema types.
//!
//! A [`FieldSchema`] describes the standardized fields a department expects
//! in its incident data: which are required, their target types, the source
//! names they are commonly exported under, and optional default values.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Target type of a standardized field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[serde(alias = "text", alias = "str")]
    String,
    #[serde(alias = "float", alias = "numeric", alias = "decimal")]
    Number,
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "timestamp")]
    Datetime,
    Date,
    Time,
    #[serde(alias = "coordinates", alias = "geo")]
    Coordinate,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Coordinate => "coordinate",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single standardized field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Alternative source column names that map directly to this field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Value used when the source value is missing or fails to parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            aliases: Vec::new(),
            default: None,
            format: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default = Some(value);
        self
    }

    /// The default value rendered as cell text, if it is a non-null scalar.
    pub fn default_text(&self) -> Option<String> {
        match self.default.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// Returns true when `name` equals the field name or one of its aliases,
    /// ignoring ASCII case.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// A set of required and optional fields, as loaded from a schema file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required_fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub optional_fields: Vec<FieldDefinition>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            description: None,
            required_fields: Vec::new(),
            optional_fields: Vec::new(),
        }
    }

    pub fn with_required(mut self, field: FieldDefinition) -> Self {
        self.required_fields.push(field);
        self
    }

    pub fn with_optional(mut self, field: FieldDefinition) -> Self {
        self.optional_fields.push(field);
        self
    }

    /// Checks that the schema has fields and that names are unique.
    pub fn validate(&self) -> Result<()> {
        if self.required_fields.is_empty() && self.optional_fields.is_empty() {
            return Err(ModelError::EmptySchema {
                schema: self.name.clone(),
            });
        }
        let mut seen = BTreeSet::new();
        for field in self.all_fields() {
            let name = field.name.trim();
            if name.is_empty() {
                return Err(ModelError::EmptyFieldName);
            }
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(ModelError::DuplicateField {
                    schema: self.name.clone(),
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Required fields first, then optional fields, each in file order.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.required_fields.iter().chain(self.optional_fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.all_fields()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required_fields
            .iter()
            .any(|field| field.name.eq_ignore_ascii_case(name))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.all_fields().map(|field| field.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.required_fields.len() + self.optional_fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldSchema {
        FieldSchema::new("incident")
            .with_required(
                FieldDefinition::new("incident_id", FieldType::String)
                    .with_aliases(["Incident Number", "inc_no"]),
            )
            .with_optional(
                FieldDefinition::new("priority", FieldType::Integer)
                    .with_default(serde_json::json!(3)),
            )
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let schema = sample();
        assert!(schema.field("INCIDENT_ID").is_some());
        assert!(schema.is_required("Incident_Id"));
        assert!(!schema.is_required("priority"));
        assert_eq!(schema.field_names(), vec!["incident_id", "priority"]);
    }

    #[test]
    fn aliases_answer() {
        let schema = sample();
        let field = schema.field("incident_id").unwrap();
        assert!(field.answers_to("inc_no"));
        assert!(field.answers_to("INCIDENT NUMBER"));
        assert!(!field.answers_to("incident"));
    }

    #[test]
    fn default_text_renders_scalars() {
        let schema = sample();
        assert_eq!(
            schema.field("priority").unwrap().default_text(),
            Some("3".to_string())
        );
        assert_eq!(schema.field("incident_id").unwrap().default_text(), None);
    }

    #[test]
    fn validate_rejects_duplicates() {
        let schema = sample().with_optional(FieldDefinition::new("Priority", FieldType::String));
        assert_eq!(
            schema.validate(),
            Err(ModelError::DuplicateField {
                schema: "incident".to_string(),
                name: "Priority".to_string(),
            })
        );
    }

    #[test]
    fn validate_rejects_empty_schema() {
        assert!(matches!(
            FieldSchema::new("empty").validate(),
            Err(ModelError::EmptySchema { .. })
        ));
    }

    #[test]
    fn field_type_aliases_deserialize() {
        let parsed: FieldType = serde_json::from_str("\"timestamp\"").unwrap();
        assert_eq!(parsed, FieldType::Datetime);
        let parsed: FieldType = serde_json::from_str("\"float\"").unwrap();
        assert_eq!(parsed, FieldType::Number);
        assert!(serde_json::from_str::<FieldType>("\"blob\"").is_err());
    }
}
