//! Workbook reading via calamine.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use ems_common::{excel_serial_to_datetime, format_numeric};

use crate::error::{IngestError, Result};
use crate::table::{RawTable, normalize_cell, normalize_header};

/// Reads the first worksheet, or `sheet` when given (case-insensitive).
///
/// The first non-empty row is the header; fully blank rows are skipped.
pub(crate) fn read_excel(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Excel {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(wanted) => sheet_names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| IngestError::SheetNotFound {
                sheet: wanted.to_string(),
                path: path.to_path_buf(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IngestError::NoRecords {
                path: path.to_path_buf(),
            })?,
    };
    tracing::debug!(path = %path.display(), sheet = %sheet_name, "reading worksheet");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Excel {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::with_capacity(range.height());
    for row in range.rows() {
        let cells: Vec<Option<String>> = row
            .iter()
            .map(|cell| normalize_cell(&cell_to_string(cell)))
            .collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        match headers {
            None => {
                headers = Some(
                    row.iter()
                        .map(|cell| normalize_header(&cell_to_string(cell)))
                        .collect(),
                );
            }
            Some(_) => rows.push(cells),
        }
    }

    let headers = headers.ok_or_else(|| IngestError::NoRecords {
        path: path.to_path_buf(),
    })?;
    Ok(RawTable { headers, rows })
}

/// Renders a cell as text. Date cells become ISO 8601: date-only values as
/// `YYYY-MM-DD`, time-only values as `HH:MM:SS`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_numeric(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_iso(dt.as_f64()),
        Data::Error(e) => {
            tracing::debug!(error = ?e, "workbook cell holds an error value");
            String::new()
        }
    }
}

fn serial_to_iso(serial: f64) -> String {
    let Some(dt) = excel_serial_to_datetime(serial) else {
        return format_numeric(serial);
    };
    if serial < 1.0 {
        dt.format("%H:%M:%S").to_string()
    } else if serial.fract() == 0.0 {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
