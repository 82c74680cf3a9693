//! Format dispatch and file size checks.

use std::path::Path;

use polars::prelude::DataFrame;

use crate::error::{IngestError, Result};
use crate::format::FileFormat;
use crate::readers;

/// Maximum upload size (100 MB).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Options for [`read_table`].
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Worksheet to read from a workbook; the first sheet when `None`.
    pub sheet: Option<String>,
    pub max_file_size: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl ReadOptions {
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }
}

/// Check file size against a limit.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<u64> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::io(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(metadata.len())
}

/// Reads an upload into a frame of `String` columns.
///
/// The format is chosen by file extension. Cells are trimmed and blank cells
/// are null; column names are unique.
pub fn read_table(path: &Path, options: &ReadOptions) -> Result<(DataFrame, FileFormat)> {
    let format = FileFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let size = check_file_size(path, options.max_file_size)?;
    let _span = tracing::info_span!("read", path = %path.display(), format = %format).entered();

    let table = match format {
        FileFormat::Excel => readers::excel::read_excel(path, options.sheet.as_deref())?,
        FileFormat::Csv | FileFormat::Json | FileFormat::Xml => {
            let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
            let text = readers::csv::decode_text(&bytes);
            match format {
                FileFormat::Csv => readers::csv::parse_csv(&text, path)?,
                FileFormat::Json => readers::json::read_json(&text, path)?,
                _ => readers::xml::read_xml(&text, path)?,
            }
        }
    };

    let df = table.into_frame()?;
    if df.width() > 500 {
        tracing::warn!(columns = df.width(), "upload has more than 500 columns");
    }
    tracing::info!(bytes = size, rows = df.height(), columns = df.width(), "upload read");
    Ok((df, format))
}
