//! Delimited text reading with encoding fallback.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::WINDOWS_1252;

use crate::error::{IngestError, Result};
use crate::table::{RawTable, normalize_cell, normalize_header};

/// Decodes raw bytes as UTF-8 (BOM stripped), falling back to Windows-1252.
pub(crate) fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::debug!("input is not valid UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}

/// Parses CSV text. The first non-blank row is the header.
pub(crate) fn parse_csv(text: &str, path: &Path) -> Result<RawTable> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cells: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        if cells.iter().all(Option::is_none) {
            continue;
        }
        match headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(ref header) => {
                if cells.len() > header.len() {
                    tracing::warn!(
                        path = %path.display(),
                        expected = header.len(),
                        found = cells.len(),
                        "row has more cells than the header, extra cells dropped"
                    );
                }
                rows.push(cells);
            }
        }
    }

    let headers = headers.ok_or_else(|| IngestError::NoRecords {
        path: path.to_path_buf(),
    })?;
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> RawTable {
        parse_csv(text, Path::new("calls.csv")).unwrap()
    }

    #[test]
    fn skips_blank_rows_and_pads_short_rows() {
        let table = parse("Incident,Unit,Notes\n\nF-1,E1\n,,\nF-2,M3,\"smoke, heavy\"\n");
        assert_eq!(table.headers, vec!["Incident", "Unit", "Notes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec![Some("F-1".to_string()), Some("E1".to_string())]);
        assert_eq!(table.rows[1][2].as_deref(), Some("smoke, heavy"));
    }

    #[test]
    fn header_only_is_not_an_error() {
        let table = parse("a,b\n");
        assert_eq!(table.headers.len(), 2);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn empty_input_has_no_records() {
        let err = parse_csv("\n\n", Path::new("empty.csv")).unwrap_err();
        assert!(matches!(err, IngestError::NoRecords { .. }));
    }

    #[test]
    fn decodes_bom_and_windows_1252() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFa,b"), "a,b");
        // 0xE9 is 'é' in Windows-1252 and invalid as standalone UTF-8.
        assert_eq!(decode_text(b"Caf\xE9"), "Café");
    }
}
