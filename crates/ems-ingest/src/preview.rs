//! Upload preview: the column list, sample rows and hints shown before
//! mapping.

use std::collections::BTreeMap;
use std::path::Path;

use ems_common::any_to_string_non_empty;
use ems_model::ColumnHint;
use polars::prelude::DataFrame;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::format::FileFormat;
use crate::hints::build_column_hints;
use crate::reader::{ReadOptions, read_table};

/// Default number of sample rows in a preview.
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPreview {
    pub file_name: String,
    pub format: FileFormat,
    pub columns: Vec<String>,
    /// First rows as objects keyed by column name.
    #[serde(rename = "sampleData")]
    pub sample_rows: Vec<Map<String, Value>>,
    #[serde(rename = "totalRows")]
    pub row_count: usize,
    pub column_hints: BTreeMap<String, ColumnHint>,
}

/// Reads an upload and builds its preview.
pub fn preview_file(path: &Path, sample_rows: usize, options: &ReadOptions) -> Result<UploadPreview> {
    let (df, format) = read_table(path, options)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(preview_frame(file_name, format, &df, sample_rows))
}

/// Builds a preview from an already-loaded frame.
pub fn preview_frame(
    file_name: String,
    format: FileFormat,
    df: &DataFrame,
    sample_rows: usize,
) -> UploadPreview {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let take = sample_rows.min(df.height());
    let mut samples = Vec::with_capacity(take);
    for row in 0..take {
        let mut object = Map::new();
        for col in df.get_columns() {
            let value = col
                .get(row)
                .ok()
                .and_then(any_to_string_non_empty)
                .map_or(Value::Null, Value::String);
            object.insert(col.name().to_string(), value);
        }
        samples.push(object);
    }

    UploadPreview {
        file_name,
        format,
        columns,
        sample_rows: samples,
        row_count: df.height(),
        column_hints: build_column_hints(df),
    }
}
