//! Tests for ems-model types.

use ems_model::{
    FieldMapping, MappingResult, MappingStrategy, UnmappedColumn, UnmappedReason,
};

fn sample_result() -> MappingResult {
    MappingResult {
        mappings: vec![FieldMapping {
            source_column: "Inc #".to_string(),
            target_field: "incident_id".to_string(),
            strategy: MappingStrategy::Explicit,
        }],
        unmapped: vec![
            UnmappedColumn {
                column: "Misc".to_string(),
                reason: UnmappedReason::NoMatch,
            },
            UnmappedColumn {
                column: "INCIDENT_ID".to_string(),
                reason: UnmappedReason::Duplicate {
                    claimed_by: "Inc #".to_string(),
                },
            },
        ],
        suggestions: vec![],
        missing_required: vec!["incident_date".to_string()],
    }
}

#[test]
fn mapping_result_lookups() {
    let result = sample_result();
    assert_eq!(result.target_for("Inc #"), Some("incident_id"));
    assert_eq!(result.source_for("INCIDENT_ID"), Some("Inc #"));
    assert_eq!(result.unmapped_columns(), vec!["Misc", "INCIDENT_ID"]);
    assert!(!result.is_complete());
}

#[test]
fn unmapped_reason_serializes_inline() {
    let result = sample_result();
    let json = serde_json::to_value(&result.unmapped).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"column": "Misc", "reason": "noMatch"},
            {"column": "INCIDENT_ID", "reason": "duplicate", "claimedBy": "Inc #"}
        ])
    );
}

#[test]
fn mapping_result_serializes_camel_case() {
    let json = serde_json::to_value(sample_result()).unwrap();
    assert_eq!(json["missingRequired"], serde_json::json!(["incident_date"]));
    assert_eq!(json["mappings"][0]["sourceColumn"], "Inc #");
    assert_eq!(json["mappings"][0]["strategy"], "explicit");
}
