//! Column hints for upload previews.

use std::collections::{BTreeMap, BTreeSet};

use ems_common::{any_to_string_non_empty, parse_f64};
use ems_model::ColumnHint;
use polars::prelude::*;

/// Builds column hints from a DataFrame.
///
/// Analyzes each column to determine:
/// - Whether values are numeric
/// - Ratio of unique values (cardinality)
/// - Ratio of null/missing values
pub fn build_column_hints(df: &DataFrame) -> BTreeMap<String, ColumnHint> {
    df.get_columns()
        .iter()
        .map(|col| (col.name().to_string(), analyze_column(col)))
        .collect()
}

fn analyze_column(col: &Column) -> ColumnHint {
    let total = col.len();
    if total == 0 {
        return ColumnHint {
            is_numeric: false,
            unique_ratio: 0.0,
            null_ratio: 1.0,
        };
    }

    let mut null_count = 0usize;
    let mut numeric_count = 0usize;
    let mut unique_values: BTreeSet<String> = BTreeSet::new();
    for idx in 0..total {
        match col.get(idx).ok().and_then(any_to_string_non_empty) {
            Some(value) => {
                let trimmed = value.trim();
                if parse_f64(trimmed.trim_start_matches('$').replace(',', "").as_str()).is_some()
                {
                    numeric_count += 1;
                }
                unique_values.insert(trimmed.to_string());
            }
            None => null_count += 1,
        }
    }

    let non_null = total - null_count;
    let unique_ratio = if non_null > 0 {
        unique_values.len() as f64 / non_null as f64
    } else {
        0.0
    };

    ColumnHint {
        // >90% of non-null values parse as numbers
        is_numeric: non_null > 0 && (numeric_count as f64 / non_null as f64) > 0.9,
        unique_ratio,
        null_ratio: null_count as f64 / total as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_column_hints() {
        let df = df! {
            "incident" => &["F-1", "F-2", "F-3"],
            "patients" => &["1", "2", "2"],
            "cost" => &["$1,200", "$80", "$15.50"],
        }
        .unwrap();

        let hints = build_column_hints(&df);
        assert_eq!(hints.len(), 3);

        let patients = hints.get("patients").unwrap();
        assert!(patients.is_numeric);
        assert!((patients.unique_ratio - 2.0 / 3.0).abs() < 0.01);

        assert!(hints.get("cost").unwrap().is_numeric);
        assert!(!hints.get("incident").unwrap().is_numeric);
    }

    #[test]
    fn test_column_with_nulls() {
        let df = df! {
            "col" => &[Some("A"), None, Some("B"), Some(""), None],
        }
        .unwrap();

        let hint = build_column_hints(&df).remove("col").unwrap();
        // 3 nulls/empty out of 5
        assert!((hint.null_ratio - 0.6).abs() < 0.01);
        assert!((hint.unique_ratio - 1.0).abs() < 0.01);
    }
}
