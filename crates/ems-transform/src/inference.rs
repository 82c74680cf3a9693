//! Transform inference from field types.

use ems_model::{CoordinateAxis, FieldDefinition, FieldType, TransformRule};

/// The transform applied to a field when a mapping lists none.
pub fn infer_rule(field: &FieldDefinition) -> TransformRule {
    match field.field_type {
        FieldType::String => TransformRule::text(),
        FieldType::Number => TransformRule::Numeric,
        FieldType::Integer => TransformRule::Integer,
        FieldType::Boolean => TransformRule::Boolean,
        FieldType::Datetime => TransformRule::datetime(),
        FieldType::Date => TransformRule::Date {
            formats: Vec::new(),
        },
        FieldType::Time => TransformRule::Time {
            formats: Vec::new(),
        },
        FieldType::Coordinate => TransformRule::Coordinate {
            axis: infer_axis(&field.name),
        },
    }
}

/// Longitude when the name mentions `lon`/`lng`, otherwise latitude.
pub fn infer_axis(name: &str) -> CoordinateAxis {
    let lower = name.to_ascii_lowercase();
    if lower.contains("lon") || lower.contains("lng") {
        CoordinateAxis::Longitude
    } else {
        CoordinateAxis::Latitude
    }
}
