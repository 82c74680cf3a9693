//! Fuzzy suggestions for columns no strategy matched.

use rapidfuzz::distance::jaro_winkler;

use ems_model::{FieldSchema, MappingSuggestion};

use crate::normalize::normalize_text;

/// Default minimum similarity for a suggestion.
pub const DEFAULT_SUGGESTION_THRESHOLD: f32 = 0.85;

/// Scores `column` against a field name and its aliases, keeping the best.
fn score_field(column: &str, names: &[&str]) -> f32 {
    names
        .iter()
        .map(|name| jaro_winkler::similarity(column.chars(), normalize_text(name).chars()) as f32)
        .fold(0.0, f32::max)
}

/// Suggests the closest unclaimed field for each column, if any scores at
/// least `threshold`. Suggestions are advisory and never applied.
pub(crate) fn suggest_fields<F>(
    schema: &FieldSchema,
    columns: &[&str],
    is_claimed: F,
    threshold: f32,
) -> Vec<MappingSuggestion>
where
    F: Fn(&str) -> bool,
{
    let mut suggestions = Vec::new();
    for column in columns {
        let normalized = normalize_text(column);
        if normalized.is_empty() {
            continue;
        }
        let mut best: Option<(&str, f32)> = None;
        for field in schema.all_fields() {
            if is_claimed(&field.name) {
                continue;
            }
            let names: Vec<&str> = std::iter::once(field.name.as_str())
                .chain(field.aliases.iter().map(String::as_str))
                .collect();
            let score = score_field(&normalized, &names);
            if score >= threshold && best.is_none_or(|(_, current)| score > current) {
                best = Some((field.name.as_str(), score));
            }
        }
        if let Some((field, confidence)) = best {
            tracing::debug!(column, field, confidence, "suggested mapping");
            suggestions.push(MappingSuggestion {
                source_column: (*column).to_string(),
                target_field: field.to_string(),
                confidence,
            });
        }
    }
    suggestions
}
