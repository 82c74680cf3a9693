//! Column name normalization.

/// Lowercases and folds every run of non-alphanumeric characters into a
/// single `_`, trimming leading and trailing underscores.
///
/// `"Incident Date"` becomes `incident_date`, `"Unit #"` becomes `unit`.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Normalizes text for fuzzy comparison: lowercase words separated by spaces.
pub fn normalize_text(raw: &str) -> String {
    normalize_name(raw).replace('_', " ")
}

/// Candidate names for a dotted path, most specific first: the whole path
/// with dots as underscores, then the last segment.
pub fn dotted_candidates(column: &str) -> Vec<String> {
    if !column.contains('.') {
        return Vec::new();
    }
    let mut candidates = vec![column.replace('.', "_")];
    if let Some(last) = column.rsplit('.').next().map(str::trim)
        && !last.is_empty()
        && last != candidates[0]
    {
        candidates.push(last.to_string());
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Incident Date"), "incident_date");
        assert_eq!(normalize_name("  Unit # "), "unit");
        assert_eq!(normalize_name("Call--Received/Time"), "call_received_time");
        assert_eq!(normalize_name("__zip_code__"), "zip_code");
        assert_eq!(normalize_name("###"), "");
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Dispatch_Time"), "dispatch time");
    }

    #[test]
    fn test_dotted_candidates() {
        assert_eq!(
            dotted_candidates("location.latitude"),
            vec!["location_latitude", "latitude"]
        );
        assert!(dotted_candidates("latitude").is_empty());
    }
}
