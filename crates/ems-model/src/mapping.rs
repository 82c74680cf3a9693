use serde::{Deserialize, Serialize};

/// Statistics about a source column, used when suggesting mappings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHint {
    pub is_numeric: bool,
    pub unique_ratio: f64,
    pub null_ratio: f64,
}

/// How a source column was matched to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MappingStrategy {
    /// Listed in the format spec.
    Explicit,
    /// Field name or alias.
    Direct,
    /// Dotted path such as `location.latitude`.
    DottedPath,
    /// Lowercased with separators folded to underscores.
    Normalized,
}

impl MappingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Direct => "direct",
            Self::DottedPath => "dotted path",
            Self::Normalized => "normalized",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_column: String,
    pub target_field: String,
    pub strategy: MappingStrategy,
}

/// A fuzzy match offered for review; never applied automatically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSuggestion {
    pub source_column: String,
    pub target_field: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum UnmappedReason {
    NoMatch,
    /// The column resolved to a field another column already claimed.
    Duplicate {
        #[serde(rename = "claimedBy")]
        claimed_by: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmappedColumn {
    pub column: String,
    #[serde(flatten)]
    pub reason: UnmappedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
    pub mappings: Vec<FieldMapping>,
    pub unmapped: Vec<UnmappedColumn>,
    pub suggestions: Vec<MappingSuggestion>,
    /// Required fields with no source column, split/combine target or default.
    pub missing_required: Vec<String>,
}

impl MappingResult {
    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.source_column == source)
            .map(|m| m.target_field.as_str())
    }

    pub fn source_for(&self, target: &str) -> Option<&str> {
        self.mappings
            .iter()
            .find(|m| m.target_field.eq_ignore_ascii_case(target))
            .map(|m| m.source_column.as_str())
    }

    pub fn unmapped_columns(&self) -> Vec<&str> {
        self.unmapped.iter().map(|u| u.column.as_str()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}
