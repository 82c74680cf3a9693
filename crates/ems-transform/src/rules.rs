//! Compiled transform chains.

use ems_model::{CoordinateAxis, TextCase, TransformRule};
use regex::Regex;

use crate::error::{Result, TransformError};
use crate::normalization::{
    format_date, format_time, format_utc, normalize_text, parse_boolean, parse_date,
    parse_datetime_utc, parse_time, transform_to_coordinate, transform_to_integer,
    transform_to_numeric,
};
use crate::timezone::SourceTimezone;

/// Job-wide settings a rule falls back on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleContext<'a> {
    pub timezone: SourceTimezone,
    /// Extra patterns tried after a rule's own and before the built-ins.
    pub date_formats: &'a [String],
}

/// A [`TransformRule`] with its regex compiled and zone resolved.
#[derive(Debug, Clone)]
pub enum CompiledRule {
    Datetime {
        formats: Vec<String>,
        timezone: SourceTimezone,
    },
    Date {
        formats: Vec<String>,
    },
    Time {
        formats: Vec<String>,
    },
    Numeric,
    Integer,
    Text {
        case: Option<TextCase>,
    },
    Boolean,
    RegexReplace {
        regex: Regex,
        replacement: String,
    },
    RegexExtract {
        regex: Regex,
        group: usize,
    },
    Split {
        delimiter: String,
        index: usize,
    },
    Coordinate {
        axis: CoordinateAxis,
    },
}

fn merged_formats(own: &[String], ctx: &RuleContext<'_>) -> Vec<String> {
    own.iter().chain(ctx.date_formats).cloned().collect()
}

fn compile_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| TransformError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl CompiledRule {
    pub fn compile(rule: &TransformRule, ctx: &RuleContext<'_>) -> Result<Self> {
        Ok(match rule {
            TransformRule::Datetime { formats, timezone } => Self::Datetime {
                formats: merged_formats(formats, ctx),
                timezone: match timezone {
                    Some(name) => name.parse()?,
                    None => ctx.timezone,
                },
            },
            TransformRule::Date { formats } => Self::Date {
                formats: merged_formats(formats, ctx),
            },
            TransformRule::Time { formats } => Self::Time {
                formats: merged_formats(formats, ctx),
            },
            TransformRule::Numeric => Self::Numeric,
            TransformRule::Integer => Self::Integer,
            TransformRule::Text { case } => Self::Text { case: *case },
            TransformRule::Boolean => Self::Boolean,
            TransformRule::RegexReplace {
                pattern,
                replacement,
            } => Self::RegexReplace {
                regex: compile_regex(pattern)?,
                replacement: replacement.clone(),
            },
            TransformRule::RegexExtract { pattern, group } => {
                let regex = compile_regex(pattern)?;
                // captures_len counts the implicit whole-match group
                let groups = regex.captures_len();
                let group = group.unwrap_or(if groups > 1 { 1 } else { 0 });
                if group >= groups {
                    return Err(TransformError::InvalidRule {
                        rule: rule.display_name(),
                        message: format!("pattern '{pattern}' has no group {group}"),
                    });
                }
                Self::RegexExtract { regex, group }
            }
            TransformRule::Split { delimiter, index } => {
                if delimiter.is_empty() {
                    return Err(TransformError::InvalidRule {
                        rule: rule.display_name(),
                        message: "delimiter must not be empty".to_string(),
                    });
                }
                Self::Split {
                    delimiter: delimiter.clone(),
                    index: *index,
                }
            }
            TransformRule::Coordinate { axis } => Self::Coordinate { axis: *axis },
        })
    }

    /// Applies the rule to one non-empty value. `Err` carries a short reason.
    pub fn apply(&self, value: &str) -> std::result::Result<String, String> {
        match self {
            Self::Datetime { formats, timezone } => parse_datetime_utc(value, formats, timezone)
                .map(|dt| format_utc(&dt))
                .ok_or_else(|| format!("not a timestamp in {timezone}")),
            Self::Date { formats } => parse_date(value, formats)
                .map(|date| format_date(&date))
                .ok_or_else(|| "not a date".to_string()),
            Self::Time { formats } => parse_time(value, formats)
                .map(|time| format_time(&time))
                .ok_or_else(|| "not a time of day".to_string()),
            Self::Numeric => {
                transform_to_numeric(value).ok_or_else(|| "not a number".to_string())
            }
            Self::Integer => {
                transform_to_integer(value).ok_or_else(|| "not an integer".to_string())
            }
            Self::Text { case } => Ok(normalize_text(value, *case)),
            Self::Boolean => parse_boolean(value)
                .map(|b| b.to_string())
                .ok_or_else(|| "not a yes/no value".to_string()),
            Self::RegexReplace { regex, replacement } => {
                Ok(regex.replace_all(value, replacement.as_str()).into_owned())
            }
            Self::RegexExtract { regex, group } => regex
                .captures(value)
                .and_then(|caps| caps.get(*group))
                .map(|m| m.as_str().trim().to_string())
                .ok_or_else(|| format!("no match for /{}/", regex.as_str())),
            Self::Split { delimiter, index } => value
                .split(delimiter.as_str())
                .nth(*index)
                .map(|part| part.trim().to_string())
                .ok_or_else(|| format!("no part {index} after splitting on '{delimiter}'")),
            Self::Coordinate { axis } => transform_to_coordinate(value, *axis)
                .ok_or_else(|| format!("not a valid {}", axis_name(*axis))),
        }
    }
}

fn axis_name(axis: CoordinateAxis) -> &'static str {
    match axis {
        CoordinateAxis::Latitude => "latitude",
        CoordinateAxis::Longitude => "longitude",
    }
}

/// Compiles every rule in order.
pub fn compile_chain(rules: &[TransformRule], ctx: &RuleContext<'_>) -> Result<Vec<CompiledRule>> {
    rules.iter().map(|rule| CompiledRule::compile(rule, ctx)).collect()
}

/// Runs `value` through each rule left to right.
///
/// Returns `Ok(None)` when the input, or any intermediate result, is blank.
pub fn apply_chain(
    rules: &[CompiledRule],
    value: &str,
) -> std::result::Result<Option<String>, String> {
    let mut current = value.trim().to_string();
    for rule in rules {
        if current.is_empty() {
            return Ok(None);
        }
        current = rule.apply(&current)?;
    }
    Ok(if current.is_empty() { None } else { Some(current) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rules: &[TransformRule], value: &str) -> std::result::Result<Option<String>, String> {
        let compiled = compile_chain(rules, &RuleContext::default()).unwrap();
        apply_chain(&compiled, value)
    }

    #[test]
    fn chains_left_to_right() {
        let rules = [
            TransformRule::RegexReplace {
                pattern: r"[^0-9.\-]".to_string(),
                replacement: String::new(),
            },
            TransformRule::Integer,
        ];
        assert_eq!(run(&rules, "Priority 2.0").unwrap().as_deref(), Some("2"));
        assert_eq!(run(&rules, "n/a").unwrap(), None);
    }

    #[test]
    fn regex_replace_keeps_edge_whitespace() {
        let rules = [TransformRule::RegexReplace {
            pattern: r"^(\d+)$".to_string(),
            replacement: "$1 ".to_string(),
        }];
        assert_eq!(run(&rules, "42").unwrap().as_deref(), Some("42 "));
    }

    #[test]
    fn regex_extract_group_defaults() {
        let with_group = [TransformRule::RegexExtract {
            pattern: r"Station (\d+)".to_string(),
            group: None,
        }];
        assert_eq!(run(&with_group, "Station 14 - North").unwrap().as_deref(), Some("14"));
        assert!(run(&with_group, "Headquarters").is_err());

        let whole = [TransformRule::RegexExtract {
            pattern: r"[A-Z]\d+".to_string(),
            group: None,
        }];
        assert_eq!(run(&whole, "unit E12 responding").unwrap().as_deref(), Some("E12"));
    }

    #[test]
    fn split_takes_index() {
        let rules = [TransformRule::Split {
            delimiter: "|".to_string(),
            index: 1,
        }];
        assert_eq!(run(&rules, "E1 | M3").unwrap().as_deref(), Some("M3"));
        assert!(run(&rules, "E1").is_err());
    }

    #[test]
    fn datetime_rule_zone_overrides_context() {
        let rules = [TransformRule::Datetime {
            formats: vec!["%d%m%Y %H%M".to_string()],
            timezone: Some("-06:00".to_string()),
        }];
        assert_eq!(
            run(&rules, "15012024 0830").unwrap().as_deref(),
            Some("2024-01-15T14:30:00Z")
        );
    }

    #[test]
    fn invalid_rules_fail_to_compile() {
        let ctx = RuleContext::default();
        let bad_regex = TransformRule::RegexReplace {
            pattern: "(".to_string(),
            replacement: String::new(),
        };
        assert!(matches!(
            CompiledRule::compile(&bad_regex, &ctx),
            Err(TransformError::Pattern { .. })
        ));

        let bad_group = TransformRule::RegexExtract {
            pattern: r"(\d+)".to_string(),
            group: Some(2),
        };
        assert!(matches!(
            CompiledRule::compile(&bad_group, &ctx),
            Err(TransformError::InvalidRule { .. })
        ));

        let bad_zone = TransformRule::Datetime {
            formats: vec![],
            timezone: Some("Nowhere/Else".to_string()),
        };
        assert!(matches!(
            CompiledRule::compile(&bad_zone, &ctx),
            Err(TransformError::Timezone { .. })
        ));
    }
}
