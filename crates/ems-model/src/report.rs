use serde::{Deserialize, Serialize};

/// Per-field conversion counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub field: String,
    pub source: Option<String>,
    pub converted: usize,
    pub defaulted: usize,
    pub failed: usize,
    pub empty: usize,
}

impl FieldReport {
    pub fn new(field: impl Into<String>, source: Option<String>) -> Self {
        Self {
            field: field.into(),
            source,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformReport {
    pub rows: usize,
    pub fields: Vec<FieldReport>,
    pub warnings: Vec<String>,
}

impl TransformReport {
    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.fields
            .iter()
            .find(|report| report.field.eq_ignore_ascii_case(name))
    }

    pub fn total_failed(&self) -> usize {
        self.fields.iter().map(|report| report.failed).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.total_failed() > 0
    }
}
