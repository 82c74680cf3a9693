//! CLI argument definitions for the data formatter.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ems_cli::config::CONFIG_ENV_VAR;
use ems_transform::OutputFormat;

#[derive(Parser)]
#[command(
    name = "ems-formatter",
    version,
    about = "Fire/EMS Data Formatter - map and normalize incident exports",
    long_about = "Map CAD and RMS incident exports onto a department's standard fields.\n\n\
                  Reads CSV, Excel, JSON and XML uploads, converts dates, times, numbers\n\
                  and coordinates, and writes standardized CSV or JSON."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include cell values in log messages.
    ///
    /// Incident rows can hold patient names and home addresses; values are
    /// redacted unless this flag is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML file with default settings.
    #[arg(long = "config", value_name = "PATH", env = CONFIG_ENV_VAR, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the columns, sample rows and column statistics of an upload.
    Inspect(InspectArgs),

    /// List the fields of the active schema.
    Fields(FieldsArgs),

    /// Show how an upload's columns map onto the schema.
    Map(MapArgs),

    /// Map and convert an upload and write standardized records.
    Format(FormatArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// Upload to read (csv, xlsx, xls, json or xml).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Number of sample rows to show.
    #[arg(long = "rows", value_name = "N")]
    pub rows: Option<usize>,

    /// Worksheet to read from a workbook (default: first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Print the preview as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Field schema file (default: built-in incident schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Print the schema as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct MapArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field schema file (default: built-in incident schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Format spec with explicit mappings, splits and combines.
    #[arg(long = "spec", value_name = "PATH")]
    pub spec: Option<PathBuf>,

    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Print the mapping result as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct FormatArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Where to write the standardized records.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Field schema file (default: built-in incident schema).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Format spec with explicit mappings, splits and combines.
    #[arg(long = "spec", value_name = "PATH")]
    pub spec: Option<PathBuf>,

    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Time zone of timestamps without an offset (IANA name or +HH:MM).
    #[arg(long = "timezone", value_name = "TZ")]
    pub timezone: Option<String>,

    /// Fail on the first value that cannot be converted.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Append source columns that matched no field.
    #[arg(long = "include-unmapped")]
    pub include_unmapped: bool,

    /// Output format (default: from the output extension, else csv).
    #[arg(long = "output-format", value_enum)]
    pub output_format: Option<OutputFormatArg>,

    /// Print the mapping and conversion report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Csv => Self::Csv,
            OutputFormatArg::Json => Self::Json,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
