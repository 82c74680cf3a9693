use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::Value;

use ems_cli::pipeline::{FormatRun, MapRun};
use ems_ingest::UploadPreview;
use ems_model::{FieldSchema, MappingStrategy, UnmappedReason};

/// Widest sample value shown in the inspect table.
const MAX_CELL_WIDTH: usize = 40;

pub fn print_preview(preview: &UploadPreview) {
    println!("File: {} ({})", preview.file_name, preview.format);
    println!(
        "Rows: {}  Columns: {}",
        preview.row_count,
        preview.columns.len()
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Numeric"),
        header_cell("Unique"),
        header_cell("Null"),
        header_cell("Samples"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for column in &preview.columns {
        let samples: Vec<String> = preview
            .sample_rows
            .iter()
            .filter_map(|row| row.get(column).and_then(Value::as_str))
            .map(truncate)
            .collect();
        let (numeric, unique, null) = match preview.column_hints.get(column) {
            Some(hint) => (
                flag_cell(hint.is_numeric),
                Cell::new(percent(hint.unique_ratio)),
                Cell::new(percent(hint.null_ratio)),
            ),
            None => (dim_cell("-"), dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(column).add_attribute(Attribute::Bold),
            numeric,
            unique,
            null,
            if samples.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(samples.join(" | "))
            },
        ]);
    }
    println!("{table}");
}

pub fn print_fields(schema: &FieldSchema) {
    let version = schema.version.as_deref().unwrap_or("-");
    println!("Schema: {} (version {version})", schema.name);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Default"),
        header_cell("Aliases"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for field in schema.all_fields() {
        let required = schema.is_required(&field.name);
        table.add_row(vec![
            Cell::new(&field.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(field.field_type),
            flag_cell(required),
            field
                .default_text()
                .map_or_else(|| dim_cell("-"), Cell::new),
            if field.aliases.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(field.aliases.join(", "))
            },
        ]);
    }
    println!("{table}");
}

pub fn print_mapping(run: &MapRun) {
    println!(
        "File: {} ({}, {} rows)",
        run.file_name, run.format, run.rows
    );
    let mapping = &run.mapping;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Match"),
    ]);
    apply_table_style(&mut table);
    for column in &run.columns {
        if let Some(found) = mapping.mappings.iter().find(|m| &m.source_column == column) {
            table.add_row(vec![
                Cell::new(column),
                Cell::new(&found.target_field).fg(Color::Green),
                strategy_cell(found.strategy),
            ]);
        } else if let Some(unmapped) = mapping.unmapped.iter().find(|u| &u.column == column) {
            let reason = match &unmapped.reason {
                UnmappedReason::NoMatch => dim_cell("no match"),
                UnmappedReason::Duplicate { claimed_by } => {
                    Cell::new(format!("duplicate of {claimed_by}")).fg(Color::Yellow)
                }
            };
            table.add_row(vec![Cell::new(column), dim_cell("-"), reason]);
        } else {
            table.add_row(vec![Cell::new(column), dim_cell("-"), dim_cell("consumed by split")]);
        }
    }
    println!("{table}");

    if !mapping.suggestions.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Column"),
            header_cell("Suggested field"),
            header_cell("Confidence"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 2, CellAlignment::Right);
        for suggestion in &mapping.suggestions {
            table.add_row(vec![
                Cell::new(&suggestion.source_column),
                Cell::new(&suggestion.target_field).fg(Color::Cyan),
                Cell::new(format!("{:.0}%", suggestion.confidence * 100.0)),
            ]);
        }
        println!();
        println!("Suggestions (not applied):");
        println!("{table}");
    }
    print_missing(&mapping.missing_required);
}

pub fn print_format_summary(run: &FormatRun) {
    println!(
        "Input: {} ({})",
        run.input.display(),
        run.source_format
    );
    println!(
        "Output: {} ({}, {} rows, {} columns)",
        run.output.display(),
        run.output_format,
        run.rows,
        run.columns.len()
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Source"),
        header_cell("Converted"),
        header_cell("Empty"),
        header_cell("Defaulted"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for field in &run.report.fields {
        table.add_row(vec![
            Cell::new(&field.field)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            field
                .source
                .as_deref()
                .map_or_else(|| dim_cell("default"), Cell::new),
            Cell::new(field.converted),
            count_cell(field.empty, Color::DarkGrey),
            count_cell(field.defaulted, Color::Yellow),
            count_cell(field.failed, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(run.report.total_failed(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if run.report.has_failures() {
        eprintln!("Values that failed conversion were written as empty cells.");
    }
    print_missing(&run.mapping.missing_required);
    if !run.report.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &run.report.warnings {
            eprintln!("- {warning}");
        }
    }
}

fn print_missing(missing: &[String]) {
    if !missing.is_empty() {
        eprintln!("Missing required fields: {}", missing.join(", "));
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn strategy_cell(strategy: MappingStrategy) -> Cell {
    match strategy {
        MappingStrategy::Explicit => Cell::new(strategy.as_str()).add_attribute(Attribute::Bold),
        MappingStrategy::Direct => Cell::new(strategy.as_str()),
        MappingStrategy::DottedPath | MappingStrategy::Normalized => {
            Cell::new(strategy.as_str()).fg(Color::Yellow)
        }
    }
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

fn truncate(value: &str) -> String {
    if value.chars().count() <= MAX_CELL_WIDTH {
        value.to_string()
    } else {
        let head: String = value.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{head}…")
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
