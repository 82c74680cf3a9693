//! Output assembly: mapping, value conversion, splits, combines and
//! defaults for one upload.

use std::collections::HashMap;

use ems_common::{column_strings, redact_value, string_frame};
use ems_map::FieldMapper;
use ems_model::{
    CaseInsensitiveSet, FieldDefinition, FieldReport, FieldSchema, FormatSpec, MappingResult,
    MappingStrategy, TransformReport,
};
use polars::prelude::DataFrame;

use crate::combine::combine_date_time;
use crate::error::{Result, TransformError};
use crate::inference::infer_rule;
use crate::rules::{CompiledRule, RuleContext, apply_chain, compile_chain};
use crate::timezone::SourceTimezone;

/// Result of [`Formatter::run`].
#[derive(Debug, Clone)]
pub struct FormatOutcome {
    /// Schema fields in schema order, then any unmapped columns kept.
    pub frame: DataFrame,
    pub mapping: MappingResult,
    pub report: TransformReport,
}

/// One converted output column and its counts.
#[derive(Debug)]
struct FieldColumn {
    values: Vec<Option<String>>,
    report: FieldReport,
}

/// Collects converted cells for one field, applying the failure policy.
///
/// Every input row lands in exactly one of `converted`, `empty` or `failed`;
/// `defaulted` counts the empty and failed rows filled from the field default.
struct ColumnBuilder<'f> {
    field: &'f FieldDefinition,
    default: Option<String>,
    strict: bool,
    values: Vec<Option<String>>,
    report: FieldReport,
}

impl<'f> ColumnBuilder<'f> {
    fn new(field: &'f FieldDefinition, source: String, rows: usize, strict: bool) -> Self {
        Self {
            field,
            default: field.default_text(),
            strict,
            values: Vec::with_capacity(rows),
            report: FieldReport::new(field.name.clone(), Some(source)),
        }
    }

    fn converted(&mut self, value: String) {
        self.report.converted += 1;
        self.values.push(Some(value));
    }

    fn empty(&mut self) {
        self.report.empty += 1;
        self.fill_default();
    }

    /// `row` is the zero-based data row; messages report it one-based.
    fn failed(&mut self, row: usize, raw: &str, message: &str) -> Result<()> {
        self.report.failed += 1;
        if self.strict {
            return Err(TransformError::Value {
                field: self.field.name.clone(),
                row: row + 1,
                value: redact_value(raw).to_string(),
                message: message.to_string(),
            });
        }
        tracing::warn!(
            field = %self.field.name,
            row = row + 1,
            value = redact_value(raw),
            reason = message,
            "value could not be converted"
        );
        self.fill_default();
        Ok(())
    }

    fn fill_default(&mut self) {
        if let Some(default) = &self.default {
            self.report.defaulted += 1;
            self.values.push(Some(default.clone()));
        } else {
            self.values.push(None);
        }
    }

    /// Runs each value through `rules`.
    fn convert_all<'v>(
        mut self,
        rules: &[CompiledRule],
        values: impl Iterator<Item = Option<&'v str>>,
    ) -> Result<FieldColumn> {
        for (row, value) in values.enumerate() {
            match value {
                None => self.empty(),
                Some(raw) => match apply_chain(rules, raw) {
                    Ok(Some(out)) => self.converted(out),
                    Ok(None) => self.empty(),
                    Err(message) => self.failed(row, raw, &message)?,
                },
            }
        }
        Ok(self.finish())
    }

    fn finish(self) -> FieldColumn {
        FieldColumn {
            values: self.values,
            report: self.report,
        }
    }
}

fn find_column<'c>(columns: &'c [String], name: &str) -> Option<&'c str> {
    columns
        .iter()
        .find(|column| column.as_str() == name)
        .or_else(|| columns.iter().find(|column| column.eq_ignore_ascii_case(name)))
        .map(String::as_str)
}

/// Turns an upload frame into standardized records for one schema.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    schema: &'a FieldSchema,
}

impl<'a> Formatter<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'a FieldSchema {
        self.schema
    }

    /// Maps and converts `df` according to `spec`.
    ///
    /// Unconvertible values become the field default or null and are counted
    /// in the report; with `spec.strict` the first one aborts the run.
    pub fn run(&self, df: &DataFrame, spec: &FormatSpec) -> Result<FormatOutcome> {
        let _span = tracing::info_span!(
            "format",
            schema = %self.schema.name,
            rows = df.height(),
            columns = df.width()
        )
        .entered();

        let mapper = FieldMapper::new(self.schema).with_spec(spec)?;
        let timezone: SourceTimezone = match spec.source_timezone.as_deref() {
            Some(name) => name.parse()?,
            None => SourceTimezone::default(),
        };
        let ctx = RuleContext {
            timezone,
            date_formats: &spec.date_formats,
        };

        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mapping = mapper.map_columns(&columns);
        let rows = df.height();
        let mut produced: HashMap<String, FieldColumn> = HashMap::new();
        let mut warnings = Vec::new();

        for field_mapping in &mapping.mappings {
            let Some(field) = self.schema.field(&field_mapping.target_field) else {
                continue;
            };
            let explicit = spec
                .explicit_mapping(&field_mapping.source_column)
                .filter(|_| field_mapping.strategy == MappingStrategy::Explicit)
                .filter(|m| !m.transforms.is_empty());
            let rules = match explicit {
                Some(m) => compile_chain(&m.transforms, &ctx)?,
                None => compile_chain(&[infer_rule(field)], &ctx)?,
            };
            let values = column_strings(df, &field_mapping.source_column)?;
            let column = ColumnBuilder::new(
                field,
                field_mapping.source_column.clone(),
                rows,
                spec.strict,
            )
            .convert_all(&rules, values.iter().map(Option::as_deref))?;
            produced.insert(field.name.to_ascii_lowercase(), column);
        }

        for split in &spec.splits {
            let Some(source) = find_column(&columns, &split.source) else {
                warnings.push(format!("split source column '{}' not found", split.source));
                continue;
            };
            let values = column_strings(df, source)?;
            let parts: Vec<Vec<&str>> = values
                .iter()
                .map(|value| match value {
                    Some(v) => v.split(split.delimiter.as_str()).map(str::trim).collect(),
                    None => Vec::new(),
                })
                .collect();
            for (position, target) in split.targets.iter().enumerate() {
                let Some(field) = self.schema.field(target) else {
                    continue;
                };
                let rules = compile_chain(&[infer_rule(field)], &ctx)?;
                let column = ColumnBuilder::new(field, source.to_string(), rows, spec.strict)
                    .convert_all(
                        &rules,
                        parts
                            .iter()
                            .map(|row| row.get(position).copied().filter(|p| !p.is_empty())),
                    )?;
                produced.insert(field.name.to_ascii_lowercase(), column);
            }
        }

        for combine in &spec.combines {
            let Some(date_column) = find_column(&columns, &combine.date_column) else {
                warnings.push(format!(
                    "combine date column '{}' not found",
                    combine.date_column
                ));
                continue;
            };
            let time_column = match combine.time_column.as_deref() {
                Some(name) => match find_column(&columns, name) {
                    Some(found) => Some(found),
                    None => {
                        warnings.push(format!("combine time column '{name}' not found"));
                        continue;
                    }
                },
                None => None,
            };
            let Some(field) = self.schema.field(&combine.target) else {
                continue;
            };
            let zone: SourceTimezone = match combine.timezone.as_deref() {
                Some(name) => name.parse()?,
                None => ctx.timezone,
            };

            let dates = column_strings(df, date_column)?;
            let times = match time_column {
                Some(name) => column_strings(df, name)?,
                None => vec![None; rows],
            };
            let source = match time_column {
                Some(time) => format!("{date_column} + {time}"),
                None => date_column.to_string(),
            };
            let mut builder = ColumnBuilder::new(field, source, rows, spec.strict);
            for (row, (date, time)) in dates.iter().zip(&times).enumerate() {
                let Some(date) = date.as_deref() else {
                    builder.empty();
                    continue;
                };
                match combine_date_time(date, time.as_deref(), &zone, &spec.date_formats) {
                    Ok(value) => builder.converted(value),
                    Err(failure) => {
                        let raw = match time {
                            Some(time) => format!("{date} {time}"),
                            None => date.to_string(),
                        };
                        builder.failed(row, &raw, failure.message())?;
                    }
                }
            }
            produced.insert(field.name.to_ascii_lowercase(), builder.finish());
        }

        let mut output: Vec<(String, Vec<Option<String>>)> = Vec::new();
        let mut reports = Vec::new();
        for field in self.schema.all_fields() {
            let key = field.name.to_ascii_lowercase();
            if let Some(column) = produced.remove(&key) {
                output.push((field.name.clone(), column.values));
                reports.push(column.report);
            } else if let Some(default) = field.default_text() {
                let mut report = FieldReport::new(field.name.clone(), None);
                report.defaulted = rows;
                output.push((field.name.clone(), vec![Some(default); rows]));
                reports.push(report);
            } else if self.schema.is_required(&field.name) {
                warnings.push(format!("required field '{}' has no source", field.name));
            }
        }

        if spec.include_unmapped {
            let field_names =
                CaseInsensitiveSet::new(output.iter().map(|(name, _)| name.as_str()));
            for unmapped in &mapping.unmapped {
                if field_names.contains(&unmapped.column) {
                    warnings.push(format!(
                        "unmapped column '{}' dropped: it would collide with an output field",
                        unmapped.column
                    ));
                    continue;
                }
                let values = column_strings(df, &unmapped.column)?;
                output.push((unmapped.column.clone(), values));
            }
        }

        let report = TransformReport {
            rows,
            fields: reports,
            warnings,
        };
        for warning in &report.warnings {
            tracing::warn!("{warning}");
        }
        tracing::info!(
            fields = report.fields.len(),
            failed = report.total_failed(),
            "format complete"
        );

        Ok(FormatOutcome {
            frame: string_frame(output)?,
            mapping,
            report,
        })
    }
}
