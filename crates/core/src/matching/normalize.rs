//! Text normalisation shared by the matching strategies.
//!
//! All rules here are English-only heuristics.

/// Descriptive words stripped from the front of a query.
pub const DECORATION_PREFIXES: &[&str] = &[
    "fresh", "organic", "premium", "quality", "best", "top", "local", "farm",
];

/// Generic nouns stripped from the end of a query.
pub const DECORATION_SUFFIXES: &[&str] = &[
    "fruit",
    "fruits",
    "vegetable",
    "vegetables",
    "item",
    "items",
    "product",
    "products",
    "food",
    "foods",
];

/// Lowercase, trim and collapse runs of whitespace to a single space.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The singular/plural forms of an already normalised query: the query with
/// a trailing "s" added, and (when present) with its trailing "s" removed.
#[must_use]
pub fn plural_variants(normalized: &str) -> Vec<String> {
    let mut variants = vec![format!("{normalized}s")];
    if let Some(stem) = normalized.strip_suffix('s')
        && !stem.is_empty()
    {
        variants.push(stem.to_string());
    }
    variants
}

/// Remove decoration prefixes and suffixes from a normalised query.
///
/// Returns `None` when nothing was stripped or when what remains is shorter
/// than two characters.
#[must_use]
pub fn strip_decorations(normalized: &str) -> Option<String> {
    let mut words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();
    let original_len = words.len();

    while words
        .first()
        .is_some_and(|w| DECORATION_PREFIXES.contains(w))
    {
        words.remove(0);
    }
    while words
        .last()
        .is_some_and(|w| DECORATION_SUFFIXES.contains(w))
    {
        words.pop();
    }

    if words.len() == original_len {
        return None;
    }
    let cleaned = words.join(" ");
    (cleaned.chars().count() >= 2).then_some(cleaned)
}

/// Whitespace-separated tokens of a normalised string.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}

/// First `n` characters of a token (fewer if the token is shorter).
#[must_use]
pub fn char_prefix(token: &str, n: usize) -> &str {
    token
        .char_indices()
        .nth(n)
        .map_or(token, |(idx, _)| token.get(..idx).unwrap_or(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Fresh   TOMATOES "), "fresh tomatoes");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_plural_variants() {
        assert_eq!(plural_variants("apples"), vec!["appless", "apple"]);
        assert_eq!(plural_variants("milk"), vec!["milks"]);
        assert_eq!(plural_variants("s"), vec!["ss"]);
    }

    #[test]
    fn test_strip_decorations_prefixes_and_suffixes() {
        assert_eq!(
            strip_decorations("fresh organic mango fruit").as_deref(),
            Some("mango")
        );
        assert_eq!(strip_decorations("local farm eggs").as_deref(), Some("eggs"));
    }

    #[test]
    fn test_strip_decorations_requires_change() {
        assert_eq!(strip_decorations("bananas"), None);
    }

    #[test]
    fn test_strip_decorations_rejects_too_short() {
        assert_eq!(strip_decorations("fresh"), None);
        assert_eq!(strip_decorations("fresh x"), None);
    }

    #[test]
    fn test_char_prefix() {
        assert_eq!(char_prefix("tomato", 3), "tom");
        assert_eq!(char_prefix("to", 3), "to");
        assert_eq!(char_prefix("jalapeño", 7), "jalapeñ");
    }
}
