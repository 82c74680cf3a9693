use anyhow::{Context, Result};
use serde::Serialize;

use ems_cli::config::Config;
use ems_cli::pipeline::{
    FormatRequest, FormatRun, JobOverrides, format_file, inspect_file, load_schema, load_spec,
    map_file, resolve_output_format, resolve_spec,
};
use ems_ingest::{ReadOptions, UploadPreview};

use crate::cli::{FieldsArgs, FormatArgs, InspectArgs, MapArgs};
use crate::summary::{print_fields, print_format_summary, print_mapping, print_preview};

/// Upload-preview response body.
#[derive(Serialize)]
struct InspectResponse<'a> {
    success: bool,
    #[serde(flatten)]
    preview: &'a UploadPreview,
}

fn read_options(sheet: Option<&String>) -> ReadOptions {
    match sheet {
        Some(sheet) => ReadOptions::default().with_sheet(sheet.as_str()),
        None => ReadOptions::default(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn run_inspect(args: &InspectArgs, config: &Config) -> Result<()> {
    let rows = args.rows.unwrap_or_else(|| config.sample_rows());
    let preview = inspect_file(&args.file, rows, &read_options(args.sheet.as_ref()))?;
    if args.json {
        print_json(&InspectResponse {
            success: true,
            preview: &preview,
        })
    } else {
        print_preview(&preview);
        Ok(())
    }
}

pub fn run_fields(args: &FieldsArgs, config: &Config) -> Result<()> {
    let schema = load_schema(args.schema.as_deref().or(config.schema_path.as_deref()))?;
    if args.json {
        print_json(&schema)
    } else {
        print_fields(&schema);
        Ok(())
    }
}

pub fn run_map(args: &MapArgs, config: &Config) -> Result<()> {
    let schema = load_schema(args.schema.as_deref().or(config.schema_path.as_deref()))?;
    let spec = load_spec(args.spec.as_deref())?;
    let run = map_file(
        &args.file,
        &read_options(args.sheet.as_ref()),
        &schema,
        &spec,
    )?;
    if args.json {
        print_json(&run)
    } else {
        print_mapping(&run);
        Ok(())
    }
}

pub fn run_format(args: &FormatArgs, config: &Config) -> Result<FormatRun> {
    let schema = load_schema(args.schema.as_deref().or(config.schema_path.as_deref()))?;
    let overrides = JobOverrides {
        timezone: args.timezone.clone(),
        strict: args.strict,
        include_unmapped: args.include_unmapped,
    };
    let spec = resolve_spec(load_spec(args.spec.as_deref())?, &overrides, config);
    let output_format =
        resolve_output_format(args.output_format.map(Into::into), config, &args.output)?;

    let run = format_file(&FormatRequest {
        input: &args.file,
        output: &args.output,
        output_format,
        read_options: read_options(args.sheet.as_ref()),
        schema: &schema,
        spec: &spec,
    })?;
    if args.json {
        print_json(&serde_json::json!({
            "output": run.output,
            "outputFormat": run.output_format.as_str(),
            "rows": run.rows,
            "columns": run.columns,
            "mapping": run.mapping,
            "report": run.report,
        }))?;
    } else {
        print_format_summary(&run);
    }
    Ok(run)
}
