//! Format spec: the user-supplied description of one formatting job.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::transform::TransformRule;

/// An explicit source-column to field mapping, with optional transforms.
///
/// When `transforms` is empty, the transform is inferred from the target
/// field's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transforms: Vec<TransformRule>,
}

impl ColumnMapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            transforms: Vec::new(),
        }
    }

    pub fn with_transform(mut self, rule: TransformRule) -> Self {
        self.transforms.push(rule);
        self
    }
}

/// Splits one source column into several target fields by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRule {
    pub source: String,
    pub delimiter: String,
    pub targets: Vec<String>,
}

/// Merges a date column and a time column into one UTC timestamp field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineRule {
    pub date_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_column: Option<String>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatSpec {
    /// IANA zone name or fixed offset used for values without an offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_timezone: Option<String>,
    #[serde(default)]
    pub mappings: Vec<ColumnMapping>,
    #[serde(default)]
    pub splits: Vec<SplitRule>,
    #[serde(default)]
    pub combines: Vec<CombineRule>,
    /// Extra date/time patterns tried before the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_formats: Vec<String>,
    #[serde(default)]
    pub include_unmapped: bool,
    #[serde(default)]
    pub strict: bool,
}

impl FormatSpec {
    pub fn validate(&self) -> Result<()> {
        for split in &self.splits {
            if split.targets.is_empty() {
                return Err(ModelError::EmptySplitTargets {
                    source_column: split.source.clone(),
                });
            }
            if split.delimiter.is_empty() {
                return Err(ModelError::Message(format!(
                    "split rule for '{}' has an empty delimiter",
                    split.source
                )));
            }
        }
        Ok(())
    }

    pub fn explicit_mapping(&self, source: &str) -> Option<&ColumnMapping> {
        self.mappings
            .iter()
            .find(|mapping| mapping.source.eq_ignore_ascii_case(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_spec() {
        let spec: FormatSpec = serde_json::from_str(
            r#"{
                "sourceTimezone": "America/Chicago",
                "mappings": [{"source": "Call Date", "target": "incident_date",
                              "transforms": [{"type": "date"}]}],
                "splits": [{"source": "Location", "delimiter": ",",
                            "targets": ["latitude", "longitude"]}],
                "combines": [{"dateColumn": "Call Date", "timeColumn": "Call Time",
                              "target": "call_received"}],
                "includeUnmapped": true
            }"#,
        )
        .unwrap();

        assert_eq!(spec.source_timezone.as_deref(), Some("America/Chicago"));
        assert!(spec.include_unmapped);
        assert!(!spec.strict);
        assert_eq!(
            spec.explicit_mapping("call date").map(|m| m.target.as_str()),
            Some("incident_date")
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn rejects_split_without_targets() {
        let spec = FormatSpec {
            splits: vec![SplitRule {
                source: "Location".to_string(),
                delimiter: ",".to_string(),
                targets: vec![],
            }],
            ..FormatSpec::default()
        };
        assert!(matches!(
            spec.validate(),
            Err(ModelError::EmptySplitTargets { .. })
        ));
    }
}
