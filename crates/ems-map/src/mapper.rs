//! Mapping engine implementation.

use std::collections::HashMap;

use ems_model::{
    FieldDefinition, FieldMapping, FieldSchema, FormatSpec, MappingResult, MappingStrategy, UnmappedColumn,
    UnmappedReason,
};

use crate::error::{MappingError, Result};
use crate::normalize::{dotted_candidates, normalize_name};
use crate::suggest::{DEFAULT_SUGGESTION_THRESHOLD, suggest_fields};

/// Name and alias lookup tables for one schema.
#[derive(Debug, Default)]
struct FieldIndex {
    exact: HashMap<String, String>,
    folded: HashMap<String, String>,
    normalized: HashMap<String, String>,
}

impl FieldIndex {
    fn build(schema: &FieldSchema) -> Self {
        let mut index = Self::default();
        // Field names first so an alias never shadows another field's name.
        for field in schema.all_fields() {
            index.insert(&field.name, &field.name);
        }
        for field in schema.all_fields() {
            for alias in &field.aliases {
                index.insert(alias, &field.name);
            }
        }
        index
    }

    fn insert(&mut self, key: &str, field: &str) {
        let key = key.trim();
        self.exact
            .entry(key.to_string())
            .or_insert_with(|| field.to_string());
        self.folded
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| field.to_string());
        let normalized = normalize_name(key);
        if !normalized.is_empty() {
            self.normalized
                .entry(normalized)
                .or_insert_with(|| field.to_string());
        }
    }

    /// Exact match, then ASCII case-insensitive.
    fn direct(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.exact
            .get(name)
            .or_else(|| self.folded.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    fn normalized(&self, name: &str) -> Option<&str> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }
        self.direct(&normalized)
            .or_else(|| self.normalized.get(&normalized).map(String::as_str))
    }
}

/// Maps source columns to the fields of a schema.
///
/// Strategies are tried in order: explicit spec mappings, field name or alias,
/// dotted path, normalized name. Each field is claimed by at most one column.
#[derive(Debug)]
pub struct FieldMapper<'a> {
    schema: &'a FieldSchema,
    spec: Option<&'a FormatSpec>,
    index: FieldIndex,
}

impl<'a> FieldMapper<'a> {
    pub fn new(schema: &'a FieldSchema) -> Self {
        Self {
            schema,
            spec: None,
            index: FieldIndex::build(schema),
        }
    }

    /// Attaches a format spec after checking that every rule targets a known
    /// field and that no field is produced twice.
    pub fn with_spec(mut self, spec: &'a FormatSpec) -> Result<Self> {
        spec.validate()?;
        let mut producers: HashMap<String, String> = HashMap::new();
        let mut claim = |target: &str, producer: &str| -> Result<()> {
            let field = self
                .schema
                .field(target)
                .ok_or_else(|| MappingError::UnknownTarget {
                    source_column: producer.to_string(),
                    target: target.to_string(),
                })?;
            let key = field.name.to_ascii_lowercase();
            if let Some(first) = producers.get(&key) {
                return Err(MappingError::TargetConflict {
                    target: field.name.clone(),
                    first: first.clone(),
                    second: producer.to_string(),
                });
            }
            producers.insert(key, producer.to_string());
            Ok(())
        };
        for mapping in &spec.mappings {
            claim(&mapping.target, &mapping.source)?;
        }
        for split in &spec.splits {
            for target in &split.targets {
                claim(target, &split.source)?;
            }
        }
        for combine in &spec.combines {
            claim(&combine.target, &combine.date_column)?;
        }
        self.spec = Some(spec);
        Ok(self)
    }

    /// Resolves a column through the automatic strategies.
    pub fn resolve(&self, column: &str) -> Option<(&str, MappingStrategy)> {
        if let Some(field) = self.index.direct(column) {
            return Some((field, MappingStrategy::Direct));
        }
        for candidate in dotted_candidates(column) {
            if let Some(field) = self.index.direct(&candidate) {
                return Some((field, MappingStrategy::DottedPath));
            }
        }
        self.index
            .normalized(column)
            .map(|field| (field, MappingStrategy::Normalized))
    }

    pub fn map_columns(&self, columns: &[String]) -> MappingResult {
        let mut claimed: HashMap<String, String> = HashMap::new();
        let mut mappings: Vec<(usize, FieldMapping)> = Vec::new();
        let mut unmapped: Vec<(usize, UnmappedColumn)> = Vec::new();
        let mut pending: Vec<usize> = Vec::new();

        // Split and combine targets are reserved for their rules.
        if let Some(spec) = self.spec {
            for split in &spec.splits {
                for target in &split.targets {
                    claimed.insert(target.to_ascii_lowercase(), split.source.clone());
                }
            }
            for combine in &spec.combines {
                claimed.insert(
                    combine.target.to_ascii_lowercase(),
                    combine.date_column.clone(),
                );
            }
        }

        // Explicit mappings claim their fields before any automatic match.
        let mut explicit: Vec<(usize, bool, &FieldDefinition)> = Vec::new();
        for (idx, column) in columns.iter().enumerate() {
            let is_split_source = self.spec.is_some_and(|spec| {
                spec.splits
                    .iter()
                    .any(|split| split.source.eq_ignore_ascii_case(column))
            });
            let found = self
                .spec
                .and_then(|spec| spec.explicit_mapping(column))
                .and_then(|mapping| {
                    self.schema
                        .field(&mapping.target)
                        .map(|field| (mapping.source == *column, field))
                });
            match found {
                Some((exact, field)) => explicit.push((idx, exact, field)),
                None if is_split_source => {
                    tracing::debug!(column = %column, "column consumed by split rule");
                }
                None => pending.push(idx),
            }
        }
        // A column spelled exactly like the mapping source beats its case variants.
        explicit.sort_by_key(|(idx, exact, _)| (!*exact, *idx));
        for (idx, _, field) in explicit {
            let column = &columns[idx];
            let key = field.name.to_ascii_lowercase();
            if let Some(owner) = claimed.get(&key) {
                tracing::debug!(column = %column, field = %field.name, claimed_by = %owner, "field already claimed");
                unmapped.push((
                    idx,
                    UnmappedColumn {
                        column: column.clone(),
                        reason: UnmappedReason::Duplicate {
                            claimed_by: owner.clone(),
                        },
                    },
                ));
                continue;
            }
            claimed.insert(key, column.clone());
            tracing::debug!(column = %column, field = %field.name, "explicit mapping");
            mappings.push((
                idx,
                FieldMapping {
                    source_column: column.clone(),
                    target_field: field.name.clone(),
                    strategy: MappingStrategy::Explicit,
                },
            ));
        }

        for idx in pending {
            let column = &columns[idx];
            match self.resolve(column) {
                Some((field, strategy)) => {
                    let key = field.to_ascii_lowercase();
                    if let Some(owner) = claimed.get(&key) {
                        tracing::debug!(column = %column, field, claimed_by = %owner, "field already claimed");
                        unmapped.push((
                            idx,
                            UnmappedColumn {
                                column: column.clone(),
                                reason: UnmappedReason::Duplicate {
                                    claimed_by: owner.clone(),
                                },
                            },
                        ));
                    } else {
                        tracing::debug!(column = %column, field, strategy = strategy.as_str(), "mapped");
                        claimed.insert(key, column.clone());
                        mappings.push((
                            idx,
                            FieldMapping {
                                source_column: column.clone(),
                                target_field: field.to_string(),
                                strategy,
                            },
                        ));
                    }
                }
                None => unmapped.push((
                    idx,
                    UnmappedColumn {
                        column: column.clone(),
                        reason: UnmappedReason::NoMatch,
                    },
                )),
            }
        }

        mappings.sort_by_key(|(idx, _)| *idx);
        unmapped.sort_by_key(|(idx, _)| *idx);
        let mappings: Vec<FieldMapping> = mappings.into_iter().map(|(_, m)| m).collect();
        let unmapped: Vec<UnmappedColumn> = unmapped.into_iter().map(|(_, u)| u).collect();

        let missing_required = self
            .schema
            .required_fields
            .iter()
            .filter(|field| {
                field.default_text().is_none()
                    && !claimed.contains_key(&field.name.to_ascii_lowercase())
            })
            .map(|field| field.name.clone())
            .collect();

        let no_match: Vec<&str> = unmapped
            .iter()
            .filter(|u| u.reason == UnmappedReason::NoMatch)
            .map(|u| u.column.as_str())
            .collect();
        let suggestions = suggest_fields(
            self.schema,
            &no_match,
            |field| claimed.contains_key(&field.to_ascii_lowercase()),
            DEFAULT_SUGGESTION_THRESHOLD,
        );

        MappingResult {
            mappings,
            unmapped,
            suggestions,
            missing_required,
        }
    }
}
