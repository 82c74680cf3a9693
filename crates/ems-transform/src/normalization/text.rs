//! Text and boolean normalization.

use ems_model::TextCase;

/// Trims and collapses internal whitespace, then applies `case`.
pub fn normalize_text(value: &str, case: Option<TextCase>) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    match case {
        None => collapsed,
        Some(TextCase::Upper) => collapsed.to_uppercase(),
        Some(TextCase::Lower) => collapsed.to_lowercase(),
        Some(TextCase::Title) => title_case(&collapsed),
    }
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parses common yes/no spellings (case-insensitive).
pub fn parse_boolean(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "t" | "x" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "f" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Engine   12 ", None), "Engine 12");
        assert_eq!(normalize_text("main st", Some(TextCase::Upper)), "MAIN ST");
        assert_eq!(
            normalize_text("SOUTH  PARK ave", Some(TextCase::Title)),
            "South Park Ave"
        );
        assert_eq!(normalize_text("ALS", Some(TextCase::Lower)), "als");
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(parse_boolean("Yes"), Some(true));
        assert_eq!(parse_boolean(" X "), Some(true));
        assert_eq!(parse_boolean("OFF"), Some(false));
        assert_eq!(parse_boolean("0"), Some(false));
        assert_eq!(parse_boolean("maybe"), None);
    }
}
