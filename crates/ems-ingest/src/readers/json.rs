//! JSON record reading.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{IngestError, Result};
use crate::table::{RawTable, RecordSet, normalize_cell};

/// Keys searched, in order, for the record array of a top-level object.
pub const RECORD_KEYS: &[&str] = &["data", "records", "incidents", "rows", "items"];

pub(crate) fn read_json(text: &str, path: &Path) -> Result<RawTable> {
    let root: Value = serde_json::from_str(text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = locate_records(&root).ok_or_else(|| IngestError::NoRecords {
        path: path.to_path_buf(),
    })?;

    let mut set = RecordSet::default();
    for record in records {
        let mut cells = Vec::new();
        match record {
            Value::Object(map) => flatten_object(map, "", &mut cells),
            other => cells.push(("value".to_string(), scalar_text(other))),
        }
        set.push(cells);
    }
    if set.len() == 0 {
        return Err(IngestError::NoRecords {
            path: path.to_path_buf(),
        });
    }
    Ok(set.finish())
}

/// Finds the record list: the root array, the first array under one of
/// [`RECORD_KEYS`], then any array of objects, then the root object itself.
fn locate_records(root: &Value) -> Option<Vec<&Value>> {
    match root {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(map) => {
            for key in RECORD_KEYS {
                let found = map
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .and_then(|(_, v)| v.as_array());
                if let Some(items) = found {
                    return Some(items.iter().collect());
                }
            }
            let nested = map.values().find_map(|value| {
                value
                    .as_array()
                    .filter(|items| items.first().is_some_and(Value::is_object))
            });
            match nested {
                Some(items) => Some(items.iter().collect()),
                None if !map.is_empty() => Some(vec![root]),
                None => None,
            }
        }
        _ => None,
    }
}

fn flatten_object(map: &Map<String, Value>, prefix: &str, out: &mut Vec<(String, Option<String>)>) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_object(inner, &name, out),
            other => out.push((name, scalar_text(other))),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => normalize_cell(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) if map.is_empty() => None,
        Value::Array(items) if items.is_empty() => None,
        other => Some(other.to_string()),
    }
}
