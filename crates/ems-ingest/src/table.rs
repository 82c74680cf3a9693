//! Intermediate row table shared by the readers.

use std::collections::{BTreeSet, HashMap};

use ems_common::string_frame;
use polars::prelude::DataFrame;

use crate::error::Result;

/// Headers and rows of optional cell text, before conversion to a frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Converts to a frame of `String` columns.
    ///
    /// Blank headers become `column_<n>` (1-based) and repeated headers get
    /// `_2`, `_3`, ... suffixes. Short rows are padded with nulls.
    pub fn into_frame(self) -> Result<DataFrame> {
        let headers = unique_headers(&self.headers);
        let mut columns: Vec<Vec<Option<String>>> = headers
            .iter()
            .map(|_| Vec::with_capacity(self.rows.len()))
            .collect();
        for row in self.rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.push(cells.next().flatten());
            }
        }
        Ok(string_frame(headers.into_iter().zip(columns).collect())?)
    }
}

/// Normalizes one cell: trims whitespace and stray BOMs, blank becomes `None`.
pub(crate) fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collapses internal whitespace runs in a header to single spaces.
pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for (idx, raw) in headers.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("column_{}", idx + 1)
        } else {
            raw.clone()
        };
        let mut name = base.clone();
        let mut n = 2;
        while !seen.insert(name.clone()) {
            name = format!("{base}_{n}");
            n += 1;
        }
        out.push(name);
    }
    out
}

/// Accumulates records whose keys vary, keeping first-seen column order.
#[derive(Debug, Default)]
pub(crate) struct RecordSet {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl RecordSet {
    pub(crate) fn push(&mut self, record: Vec<(String, Option<String>)>) {
        let mut row = vec![None; self.columns.len()];
        for (key, value) in record {
            let idx = match self.index.get(&key) {
                Some(idx) => *idx,
                None => {
                    let idx = self.columns.len();
                    self.columns.push(key.clone());
                    self.index.insert(key, idx);
                    idx
                }
            };
            if row.len() <= idx {
                row.resize(idx + 1, None);
            }
            row[idx] = value;
        }
        self.rows.push(row);
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn finish(self) -> RawTable {
        let width = self.columns.len();
        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        RawTable {
            headers: self.columns,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_headers_fill_and_dedupe() {
        let headers = vec![
            "Unit".to_string(),
            String::new(),
            "Unit".to_string(),
            "Unit".to_string(),
        ];
        assert_eq!(
            unique_headers(&headers),
            vec!["Unit", "column_2", "Unit_2", "Unit_3"]
        );
    }

    #[test]
    fn record_set_keeps_first_seen_order() {
        let mut set = RecordSet::default();
        set.push(vec![
            ("b".to_string(), Some("1".to_string())),
            ("a".to_string(), Some("2".to_string())),
        ]);
        set.push(vec![
            ("c".to_string(), Some("3".to_string())),
            ("b".to_string(), None),
        ]);
        let table = set.finish();
        assert_eq!(table.headers, vec!["b", "a", "c"]);
        assert_eq!(
            table.rows[1],
            vec![None, None, Some("3".to_string())]
        );
        assert_eq!(table.rows[0].len(), 3);
    }

    #[test]
    fn into_frame_pads_short_rows() {
        let table = RawTable {
            headers: vec!["a".to_string(), "b".to_string()],
            rows: vec![vec![Some("1".to_string())]],
        };
        let df = table.into_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 2);
        assert_eq!(
            ems_common::column_strings(&df, "b").unwrap(),
            vec![None]
        );
    }

    #[test]
    fn normalize_helpers() {
        assert_eq!(normalize_cell("  \u{feff}E12 "), Some("E12".to_string()));
        assert_eq!(normalize_cell("   "), None);
        assert_eq!(normalize_header(" Call   Date "), "Call Date");
    }
}
