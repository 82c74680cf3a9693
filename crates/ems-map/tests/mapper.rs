//! Mapping a realistic CAD export against the embedded incident schema.

use ems_map::FieldMapper;
use ems_model::{ColumnMapping, FormatSpec, MappingStrategy, UnmappedReason};
use ems_schema::default_schema;

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn maps_cad_export_headers() {
    let schema = default_schema().unwrap();
    let mapper = FieldMapper::new(&schema);
    let result = mapper.map_columns(&columns(&[
        "Incident #",
        "Call Date",
        "Call Time",
        "Nature",
        "location.latitude",
        "location.longitude",
        "Unit ID",
        "Dispatch Time",
        "ON SCENE",
        "Misc",
    ]));

    assert_eq!(result.target_for("Incident #"), Some("incident_id"));
    assert_eq!(result.target_for("Call Time"), Some("incident_time"));
    assert_eq!(result.target_for("Nature"), Some("incident_type"));
    assert_eq!(result.target_for("Unit ID"), Some("unit"));
    assert_eq!(result.target_for("ON SCENE"), Some("arrival_time"));

    let strategy_of = |column: &str| {
        result
            .mappings
            .iter()
            .find(|m| m.source_column == column)
            .map(|m| m.strategy)
    };
    assert_eq!(strategy_of("location.latitude"), Some(MappingStrategy::DottedPath));
    assert_eq!(strategy_of("Dispatch Time"), Some(MappingStrategy::Normalized));
    assert_eq!(strategy_of("Call Date"), Some(MappingStrategy::Direct));

    assert_eq!(result.unmapped_columns(), vec!["Misc"]);
    assert!(result.missing_required.is_empty());
    assert!(result.is_complete());
}

#[test]
fn mappings_follow_column_order() {
    let schema = default_schema().unwrap();
    let spec = FormatSpec {
        mappings: vec![ColumnMapping::new("Box", "station")],
        ..FormatSpec::default()
    };
    let mapper = FieldMapper::new(&schema).with_spec(&spec).unwrap();
    let result = mapper.map_columns(&columns(&["Unit", "Box", "Station ID"]));

    let sources: Vec<&str> = result
        .mappings
        .iter()
        .map(|m| m.source_column.as_str())
        .collect();
    assert_eq!(sources, vec!["Unit", "Box"]);
    assert_eq!(
        result.unmapped[0].reason,
        UnmappedReason::Duplicate {
            claimed_by: "Box".to_string()
        }
    );
    assert_eq!(
        result.missing_required,
        vec![
            "incident_id",
            "incident_date",
            "incident_type",
            "latitude",
            "longitude"
        ]
    );
}

#[test]
fn misspelled_columns_get_suggestions_only() {
    let schema = default_schema().unwrap();
    let result = FieldMapper::new(&schema).map_columns(&columns(&["Arival Time"]));

    assert!(result.mappings.is_empty());
    assert_eq!(result.suggestions.len(), 1);
    assert_eq!(result.suggestions[0].target_field, "arrival_time");
    assert_eq!(result.target_for("Arival Time"), None);
}

#[test]
fn explicit_mapping_claims_field_once_across_case_variants() {
    let schema = default_schema().unwrap();
    let spec = FormatSpec {
        mappings: vec![ColumnMapping::new("CAD", "incident_id")],
        ..FormatSpec::default()
    };
    let mapper = FieldMapper::new(&schema).with_spec(&spec).unwrap();
    let result = mapper.map_columns(&columns(&["CAD", "cad", "Incident Number"]));

    let claims = result
        .mappings
        .iter()
        .filter(|m| m.target_field == "incident_id")
        .count();
    assert_eq!(claims, 1);
    assert_eq!(result.target_for("CAD"), Some("incident_id"));
    assert_eq!(result.unmapped_columns(), vec!["cad", "Incident Number"]);
    for unmapped in &result.unmapped {
        assert_eq!(
            unmapped.reason,
            UnmappedReason::Duplicate {
                claimed_by: "CAD".to_string()
            }
        );
    }
}
