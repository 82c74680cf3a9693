//! CSV and JSON writers for formatted frames.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use ems_common::{column_strings, parse_f64, parse_i64};
use ems_model::{FieldSchema, FieldType};
use polars::prelude::DataFrame;
use serde_json::{Map, Number, Value};

use crate::error::{Result, TransformError};
use crate::normalization::parse_boolean;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}' (expected csv or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn frame_columns(df: &DataFrame) -> Result<Vec<(String, Vec<Option<String>>)>> {
    df.get_column_names()
        .iter()
        .map(|name| {
            let name = name.to_string();
            let values = column_strings(df, &name)?;
            Ok((name, values))
        })
        .collect()
}

/// Placeholder path used in errors from the writer-based functions.
const STREAM_PATH: &str = "<output>";

/// Rewrites the placeholder path in a writer error to `path`.
fn with_path(err: TransformError, path: &Path) -> TransformError {
    match err {
        TransformError::Csv { source, .. } => TransformError::Csv {
            path: path.to_path_buf(),
            source,
        },
        TransformError::Json { source, .. } => TransformError::Json {
            path: path.to_path_buf(),
            source,
        },
        TransformError::Io { source, .. } => TransformError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| TransformError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes `df` as CSV with a header row; nulls become empty cells.
pub fn write_csv_to<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let columns = frame_columns(df)?;
    let csv_error = |source: csv::Error| TransformError::Csv {
        path: STREAM_PATH.into(),
        source,
    };
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(columns.iter().map(|(name, _)| name.as_str()))
        .map_err(csv_error)?;
    for row in 0..df.height() {
        out.write_record(
            columns
                .iter()
                .map(|(_, values)| values[row].as_deref().unwrap_or("")),
        )
        .map_err(csv_error)?;
    }
    out.flush().map_err(|source| TransformError::Io {
        path: STREAM_PATH.into(),
        source,
    })
}

pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    write_csv_to(df, create(path)?).map_err(|err| with_path(err, path))
}

/// Converts `df` to JSON objects in column order.
///
/// With a schema, number, integer and boolean fields become JSON numbers
/// and booleans; everything else stays a string. Nulls are `null`.
pub fn frame_to_records(
    df: &DataFrame,
    schema: Option<&FieldSchema>,
) -> Result<Vec<Map<String, Value>>> {
    let columns = frame_columns(df)?;
    let types: Vec<Option<FieldType>> = columns
        .iter()
        .map(|(name, _)| schema.and_then(|s| s.field(name)).map(|f| f.field_type))
        .collect();

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut record = Map::new();
        for ((name, values), field_type) in columns.iter().zip(&types) {
            let value = match values[row].as_deref() {
                None => Value::Null,
                Some(text) => typed_value(text, *field_type),
            };
            record.insert(name.clone(), value);
        }
        records.push(record);
    }
    Ok(records)
}

fn typed_value(text: &str, field_type: Option<FieldType>) -> Value {
    let typed = match field_type {
        Some(FieldType::Integer) => parse_i64(text).map(Value::from),
        Some(FieldType::Number | FieldType::Coordinate) => parse_f64(text)
            .and_then(Number::from_f64)
            .map(Value::Number),
        Some(FieldType::Boolean) => parse_boolean(text).map(Value::Bool),
        _ => None,
    };
    typed.unwrap_or_else(|| Value::String(text.to_string()))
}

pub fn write_json_to<W: Write>(
    df: &DataFrame,
    schema: Option<&FieldSchema>,
    mut writer: W,
) -> Result<()> {
    let records = frame_to_records(df, schema)?;
    serde_json::to_writer_pretty(&mut writer, &records).map_err(|source| {
        TransformError::Json {
            path: STREAM_PATH.into(),
            source,
        }
    })?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .map_err(|source| TransformError::Io {
            path: STREAM_PATH.into(),
            source,
        })
}

/// Writes `df` as a pretty-printed JSON array of objects.
pub fn write_json(df: &DataFrame, path: &Path, schema: Option<&FieldSchema>) -> Result<()> {
    write_json_to(df, schema, create(path)?).map_err(|err| with_path(err, path))
}

/// Writes `df` to `path` in `format`.
pub fn write_output(
    df: &DataFrame,
    path: &Path,
    format: OutputFormat,
    schema: Option<&FieldSchema>,
) -> Result<()> {
    tracing::debug!(path = %path.display(), format = %format, rows = df.height(), "writing output");
    match format {
        OutputFormat::Csv => write_csv(df, path),
        OutputFormat::Json => write_json(df, path, schema),
    }
}

#[cfg(test)]
mod tests {
    use ems_common::string_frame;
    use ems_model::FieldDefinition;

    use super::*;

    fn frame() -> DataFrame {
        string_frame(vec![
            (
                "incident_id".to_string(),
                vec![Some("F-1".to_string()), Some("F-2".to_string())],
            ),
            (
                "patient_count".to_string(),
                vec![Some("2".to_string()), None],
            ),
            (
                "notes".to_string(),
                vec![Some("smoke, heavy".to_string()), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn csv_quotes_and_blanks() {
        let mut buffer = Vec::new();
        write_csv_to(&frame(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "incident_id,patient_count,notes\nF-1,2,\"smoke, heavy\"\nF-2,,\n"
        );
    }

    #[test]
    fn json_types_follow_schema() {
        let schema = FieldSchema::new("incident")
            .with_required(FieldDefinition::new("incident_id", FieldType::String))
            .with_optional(FieldDefinition::new("patient_count", FieldType::Integer));
        let records = frame_to_records(&frame(), Some(&schema)).unwrap();
        assert_eq!(
            Value::Array(records.into_iter().map(Value::Object).collect()),
            serde_json::json!([
                {"incident_id": "F-1", "patient_count": 2, "notes": "smoke, heavy"},
                {"incident_id": "F-2", "patient_count": null, "notes": null}
            ])
        );
    }

    #[test]
    fn output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(
            OutputFormat::from_path(Path::new("out/records.csv")),
            Some(OutputFormat::Csv)
        );
    }
}
