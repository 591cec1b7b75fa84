//! Lexical helpers shared by the scorers: name similarity, type normalisation
//! and snippet truncation.

/// `1 - distance / max_len` on lower-cased names, in [0, 1]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn name_similarity(a: &str, b: &str) -> f32 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - strsim::levenshtein(&a, &b) as f32 / max_len as f32
}

/// Lower-case and drop all whitespace
#[must_use]
pub fn normalize_type(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Strip one array level (`T[]`) or one generic level (`Array<T>`, `Promise<T>`)
#[must_use]
pub fn unwrap_type(normalized: &str) -> &str {
    if let Some(inner) = normalized.strip_suffix("[]") {
        return inner;
    }
    if normalized.ends_with('>') {
        if let Some(open) = normalized.find('<') {
            return &normalized[open + 1..normalized.len() - 1];
        }
    }
    normalized
}

/// Textual type match after normalisation and single-level unwrapping
#[must_use]
pub fn types_compatible(a: &str, b: &str) -> bool {
    let a = normalize_type(a);
    let b = normalize_type(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }

    let ua = unwrap_type(&a);
    let ub = unwrap_type(&b);
    !ua.is_empty() && !ub.is_empty() && (ua == b || a == ub || ua == ub)
}

/// First `limit` chars of `text`, with `...` appended when cut
#[must_use]
pub fn truncate_example(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((boundary, _)) => format!("{}...", &text[..boundary]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_follows_edit_distance() {
        // kitten -> sitting is 3 edits over 7 chars
        assert!((name_similarity("kitten", "sitting") - 4.0 / 7.0).abs() < 1e-6);
        assert!((name_similarity("", "") - 1.0).abs() < f32::EPSILON);
        assert!(name_similarity("", "abc").abs() < f32::EPSILON);
    }

    #[test]
    fn similarity_is_case_insensitive() {
        assert!((name_similarity("Map", "map") - 1.0).abs() < f32::EPSILON);
        let sim = name_similarity("mapKeys", "mapValues");
        assert!(sim > 0.4 && sim < 0.8, "got {sim}");
        assert!(name_similarity("map", "reduce") < 0.6);
    }

    #[test]
    fn normalizes_and_unwraps_types() {
        assert_eq!(normalize_type(" Array < String > "), "array<string>");
        assert_eq!(unwrap_type("string[]"), "string");
        assert_eq!(unwrap_type("promise<user>"), "user");
        assert_eq!(unwrap_type("map<k,v<x>>"), "k,v<x>");
        assert_eq!(unwrap_type("number"), "number");
    }

    #[test]
    fn compatible_types() {
        assert!(types_compatible("string[]", "String []"));
        assert!(types_compatible("Array<number>", "number[]"));
        assert!(types_compatible("Promise<User>", "User"));
        assert!(types_compatible("boolean", "Boolean"));
        assert!(!types_compatible("string", "number"));
        assert!(!types_compatible("", ""));
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_example("abcdef", 10), "abcdef");
        assert_eq!(truncate_example("abcdef", 3), "abc...");
        assert_eq!(truncate_example("ééééé", 2), "éé...");
    }
}
