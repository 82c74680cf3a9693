//! Pipeline stages behind each subcommand.
//!
//! These functions do the work and return plain results; printing lives in
//! the binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use ems_ingest::{FileFormat, ReadOptions, UploadPreview, preview_file, read_table};
use ems_map::FieldMapper;
use ems_model::{FieldSchema, FormatSpec, MappingResult, TransformReport};
use ems_schema::resolve_schema;
use ems_transform::{Formatter, OutputFormat, write_output};
use serde::Serialize;
use tracing::{info, info_span};

use crate::config::Config;

/// Job settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct JobOverrides {
    pub timezone: Option<String>,
    pub strict: bool,
    pub include_unmapped: bool,
}

/// Loads the schema at `path`, else `EMS_SCHEMA_PATH`, else the embedded one.
pub fn load_schema(path: Option<&Path>) -> Result<FieldSchema> {
    let schema = resolve_schema(path).context("load field schema")?;
    info!(schema = %schema.name, fields = schema.len(), "field schema ready");
    Ok(schema)
}

/// Reads a JSON format spec, or returns an empty one.
pub fn load_spec(path: Option<&Path>) -> Result<FormatSpec> {
    let Some(path) = path else {
        return Ok(FormatSpec::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("read spec file {}", path.display()))?;
    let spec: FormatSpec = serde_json::from_str(&text)
        .with_context(|| format!("parse spec file {}", path.display()))?;
    spec.validate()
        .with_context(|| format!("invalid spec file {}", path.display()))?;
    Ok(spec)
}

/// Applies command-line overrides and config defaults to `spec`.
///
/// The timezone comes from the flag, then the spec, then the config file.
/// `strict` and `include_unmapped` are on if any source turns them on.
/// Config date formats are appended after the spec's own.
pub fn resolve_spec(mut spec: FormatSpec, overrides: &JobOverrides, config: &Config) -> FormatSpec {
    if let Some(timezone) = &overrides.timezone {
        spec.source_timezone = Some(timezone.clone());
    } else if spec.source_timezone.is_none() {
        spec.source_timezone.clone_from(&config.timezone);
    }
    spec.strict = overrides.strict || spec.strict || config.strict.unwrap_or(false);
    spec.include_unmapped |= overrides.include_unmapped;
    for format in &config.date_formats {
        if !spec.date_formats.contains(format) {
            spec.date_formats.push(format.clone());
        }
    }
    spec
}

/// Output format from the flag, then the config file, then the output
/// path's extension, then CSV.
pub fn resolve_output_format(
    flag: Option<OutputFormat>,
    config: &Config,
    output: &Path,
) -> Result<OutputFormat> {
    if let Some(format) = flag {
        return Ok(format);
    }
    if let Some(format) = config.output_format()? {
        return Ok(format);
    }
    Ok(OutputFormat::from_path(output).unwrap_or_default())
}

pub fn inspect_file(path: &Path, sample_rows: usize, options: &ReadOptions) -> Result<UploadPreview> {
    let _span = info_span!("inspect", file = %path.display()).entered();
    preview_file(path, sample_rows, options).with_context(|| format!("read {}", path.display()))
}

/// Result of mapping an upload's columns without converting values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRun {
    pub file_name: String,
    pub format: FileFormat,
    pub columns: Vec<String>,
    pub rows: usize,
    pub mapping: MappingResult,
}

pub fn map_file(
    path: &Path,
    options: &ReadOptions,
    schema: &FieldSchema,
    spec: &FormatSpec,
) -> Result<MapRun> {
    let _span = info_span!("map", file = %path.display()).entered();
    let (df, format) = read_table(path, options).with_context(|| format!("read {}", path.display()))?;
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mapper = FieldMapper::new(schema)
        .with_spec(spec)
        .context("check format spec against schema")?;
    let mapping = mapper.map_columns(&columns);
    info!(
        mapped = mapping.mappings.len(),
        unmapped = mapping.unmapped.len(),
        missing_required = mapping.missing_required.len(),
        "mapping complete"
    );
    Ok(MapRun {
        file_name: file_name(path),
        format,
        columns,
        rows: df.height(),
        mapping,
    })
}

/// Inputs for [`format_file`].
#[derive(Debug, Clone)]
pub struct FormatRequest<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub output_format: OutputFormat,
    pub read_options: ReadOptions,
    pub schema: &'a FieldSchema,
    pub spec: &'a FormatSpec,
}

#[derive(Debug, Clone)]
pub struct FormatRun {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_format: FileFormat,
    pub output_format: OutputFormat,
    pub rows: usize,
    /// Columns written, including kept unmapped columns.
    pub columns: Vec<String>,
    pub mapping: MappingResult,
    pub report: TransformReport,
}

/// Reads, maps, converts and writes one upload.
pub fn format_file(request: &FormatRequest<'_>) -> Result<FormatRun> {
    let _span = info_span!(
        "format_file",
        file = %request.input.display(),
        output = %request.output.display()
    )
    .entered();
    let start = Instant::now();

    let (df, source_format) = read_table(request.input, &request.read_options)
        .with_context(|| format!("read {}", request.input.display()))?;
    let outcome = Formatter::new(request.schema)
        .run(&df, request.spec)
        .with_context(|| format!("format {}", request.input.display()))?;
    write_output(
        &outcome.frame,
        request.output,
        request.output_format,
        Some(request.schema),
    )
    .with_context(|| format!("write {}", request.output.display()))?;

    let columns: Vec<String> = outcome
        .frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    info!(
        rows = df.height(),
        columns = columns.len(),
        failed = outcome.report.total_failed(),
        elapsed_ms = start.elapsed().as_millis(),
        "output written"
    );
    Ok(FormatRun {
        input: request.input.to_path_buf(),
        output: request.output.to_path_buf(),
        source_format,
        output_format: request.output_format,
        rows: df.height(),
        columns,
        mapping: outcome.mapping,
        report: outcome.report,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
