//! Upload ingestion for the Fire-EMS data formatter.
//!
//! Reads CSV, Excel workbook, JSON and XML uploads into Polars DataFrames
//! whose columns are all `String` typed, with blank cells as null.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use ems_ingest::{ReadOptions, preview_file, read_table};
//!
//! let (df, format) = read_table(Path::new("calls.csv"), &ReadOptions::default())?;
//! let preview = preview_file(Path::new("calls.xlsx"), 5, &ReadOptions::default())?;
//! ```

mod error;
mod format;
mod hints;
mod preview;
mod reader;
mod readers;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use format::FileFormat;
pub use reader::{MAX_FILE_SIZE, ReadOptions, check_file_size, read_table};
pub use readers::RECORD_KEYS;
pub use table::RawTable;

// === Preview & Column Hints ===
pub use hints::build_column_hints;
pub use preview::{DEFAULT_SAMPLE_ROWS, UploadPreview, preview_file, preview_frame};
