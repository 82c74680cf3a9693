//! Named value transforms.
//!
//! Each variant corresponds to one conversion applied to a cell value.
//! Rules are serialized with a `type` tag so format specs can list them as
//! `{"type": "regexReplace", "pattern": "...", "replacement": "..."}`.

use serde::{Deserialize, Serialize};

/// Case conversion applied by [`TransformRule::Text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    Upper,
    Lower,
    Title,
}

/// Which half of a coordinate pair a value represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateAxis {
    #[serde(alias = "lat")]
    Latitude,
    #[serde(alias = "lon", alias = "lng")]
    Longitude,
}

impl CoordinateAxis {
    /// Largest absolute value allowed on this axis.
    pub fn limit(self) -> f64 {
        match self {
            Self::Latitude => 90.0,
            Self::Longitude => 180.0,
        }
    }
}

/// A single transformation step for a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformRule {
    /// Parse and emit an ISO 8601 UTC timestamp (`YYYY-MM-DDTHH:MM:SSZ`).
    Datetime {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        formats: Vec<String>,
        /// Overrides the spec-wide source timezone.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timezone: Option<String>,
    },
    /// Parse and emit `YYYY-MM-DD`.
    Date {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        formats: Vec<String>,
    },
    /// Parse and emit `HH:MM:SS`.
    Time {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        formats: Vec<String>,
    },
    #[serde(alias = "number")]
    Numeric,
    Integer,
    #[serde(alias = "string")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        case: Option<TextCase>,
    },
    Boolean,
    RegexReplace {
        pattern: String,
        #[serde(default)]
        replacement: String,
    },
    RegexExtract {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<usize>,
    },
    Split {
        delimiter: String,
        #[serde(default)]
        index: usize,
    },
    Coordinate {
        axis: CoordinateAxis,
    },
}

impl TransformRule {
    /// Returns a human-readable display name for the transform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Datetime { .. } => "Datetime (UTC)",
            Self::Date { .. } => "Date",
            Self::Time { .. } => "Time",
            Self::Numeric => "Numeric",
            Self::Integer => "Integer",
            Self::Text { .. } => "Text",
            Self::Boolean => "Boolean",
            Self::RegexReplace { .. } => "Regex Replace",
            Self::RegexExtract { .. } => "Regex Extract",
            Self::Split { .. } => "Split",
            Self::Coordinate { .. } => "Coordinate",
        }
    }

    pub fn text() -> Self {
        Self::Text { case: None }
    }

    pub fn datetime() -> Self {
        Self::Datetime {
            formats: Vec::new(),
            timezone: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_rules() {
        let rules: Vec<TransformRule> = serde_json::from_str(
            r#"[
                {"type": "numeric"},
                {"type": "regexReplace", "pattern": "[^0-9]", "replacement": ""},
                {"type": "split", "delimiter": "-", "index": 1},
                {"type": "coordinate", "axis": "lng"},
                {"type": "datetime", "timezone": "America/Denver"}
            ]"#,
        )
        .unwrap();

        assert_eq!(rules[0], TransformRule::Numeric);
        assert_eq!(
            rules[1],
            TransformRule::RegexReplace {
                pattern: "[^0-9]".to_string(),
                replacement: String::new(),
            }
        );
        assert_eq!(
            rules[2],
            TransformRule::Split {
                delimiter: "-".to_string(),
                index: 1,
            }
        );
        assert_eq!(
            rules[3],
            TransformRule::Coordinate {
                axis: CoordinateAxis::Longitude
            }
        );
        assert_eq!(
            rules[4],
            TransformRule::Datetime {
                formats: vec![],
                timezone: Some("America/Denver".to_string()),
            }
        );
    }

    #[test]
    fn display_names() {
        assert_eq!(TransformRule::text().display_name(), "Text");
        assert_eq!(TransformRule::datetime().display_name(), "Datetime (UTC)");
    }
}
