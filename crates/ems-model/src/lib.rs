pub mod error;
pub mod field;
pub mod lookup;
pub mod mapping;
pub mod report;
pub mod spec;
pub mod transform;

pub use error::{ModelError, Result};
pub use field::{FieldDefinition, FieldSchema, FieldType};
pub use lookup::CaseInsensitiveSet;
pub use mapping::{
    ColumnHint, FieldMapping, MappingResult, MappingStrategy, MappingSuggestion, UnmappedColumn,
    UnmappedReason,
};
pub use report::{FieldReport, TransformReport};
pub use spec::{ColumnMapping, CombineRule, FormatSpec, SplitRule};
pub use transform::{CoordinateAxis, TextCase, TransformRule};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_totals() {
        let report = TransformReport {
            rows: 3,
            fields: vec![
                FieldReport {
                    field: "incident_date".to_string(),
                    source: Some("Date".to_string()),
                    converted: 2,
                    defaulted: 0,
                    failed: 1,
                    empty: 0,
                },
                FieldReport {
                    field: "priority".to_string(),
                    source: None,
                    converted: 0,
                    defaulted: 3,
                    failed: 0,
                    empty: 0,
                },
            ],
            warnings: vec![],
        };
        assert_eq!(report.total_failed(), 1);
        assert!(report.has_failures());
        assert_eq!(report.field("PRIORITY").map(|f| f.defaulted), Some(3));
    }
}
