//! Fuzzy product matching.
//!
//! Resolves free-form product references ("aples", "fresh tomatoe", "banan")
//! against a catalog snapshot. [`find_product`] is a pure function of the
//! query and the catalog: it never touches storage, and callers are
//! responsible for handing it a current catalog.
//!
//! # Strategy cascade
//!
//! | # | Strategy | Confidence |
//! |---|----------|------------|
//! | 1 | exact (case-insensitive) | exact |
//! | 2 | singular/plural | exact |
//! | 3 | decoration stripping, then 1–2 | high |
//! | 4 | weighted approximate search | high / medium / low by score |
//! | 5 | partial word overlap | low |
//! | 6 | nothing matched, suggestions only | none |

pub mod fuzzy;
pub mod index;
pub mod normalize;
pub mod strategies;

use serde::Serialize;

use crate::types::{Confidence, MatchType, Product};

pub use fuzzy::FuzzySearch;
pub use index::CatalogIndex;
pub use strategies::CASCADE;

/// Most alternatives/suggestions ever attached to a result.
pub const MAX_ALTERNATIVES: usize = 3;

/// A query prepared once for all strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// Lowercased, trimmed, whitespace-collapsed query.
    pub normalized: String,
    /// The query with decoration words removed, if that changed anything.
    pub cleaned: Option<String>,
}

impl MatchQuery {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let normalized = normalize::normalize(raw);
        let cleaned = normalize::strip_decorations(&normalized);
        Self {
            normalized,
            cleaned,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    /// Text handed to approximate search: the cleaned form when available.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.cleaned.as_deref().unwrap_or(&self.normalized)
    }
}

/// Outcome of resolving one query. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub product: Option<&'a Product>,
    pub confidence: Confidence,
    /// Other plausible products, best first, at most [`MAX_ALTERNATIVES`].
    pub alternatives: Vec<&'a Product>,
    pub match_type: MatchType,
    /// Approximate-search score (lower is better) when strategy 4 decided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl<'a> MatchResult<'a> {
    /// A result with no product and the given suggestions.
    #[must_use]
    pub const fn unresolved(suggestions: Vec<&'a Product>) -> Self {
        Self {
            product: None,
            confidence: Confidence::None,
            alternatives: suggestions,
            match_type: MatchType::None,
            score: None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.product.is_some()
    }
}

/// Resolve `query` against `catalog`.
///
/// Empty or whitespace-only queries resolve to nothing with no suggestions.
#[must_use]
pub fn find_product<'a>(query: &str, catalog: &'a [Product]) -> MatchResult<'a> {
    let query = MatchQuery::new(query);
    if query.is_empty() {
        return MatchResult::unresolved(Vec::new());
    }

    let index = CatalogIndex::new(catalog);
    CASCADE
        .iter()
        .find_map(|strategy| strategy(&query, &index))
        .unwrap_or_else(|| MatchResult::unresolved(strategies::suggestions(&query, &index)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new("Apples", Decimal::new(120, 0), "kg", 30),
            Product::new("Bananas", Decimal::new(40, 0), "dozen", 25),
            Product::new("Tomatoes", Decimal::new(30, 0), "kg", 40),
            Product::new("Milk", Decimal::new(60, 0), "litre", 20)
                .with_description("Full cream cow milk"),
            Product::new("Brown Bread", Decimal::new(45, 0), "loaf", 8),
        ]
    }

    #[test]
    fn test_empty_and_blank_queries() {
        let catalog = catalog();
        for q in ["", "   ", "\t\n"] {
            let result = find_product(q, &catalog);
            assert_eq!(result.confidence, Confidence::None);
            assert!(result.product.is_none());
            assert!(result.alternatives.is_empty());
        }
    }

    #[test]
    fn test_every_name_resolves_exactly() {
        let catalog = catalog();
        for product in &catalog {
            let result = find_product(&product.name, &catalog);
            assert_eq!(result.product.map(|p| p.id), Some(product.id));
            assert_eq!(result.confidence, Confidence::Exact);
        }
    }

    #[test]
    fn test_plural_forms_resolve() {
        let catalog = catalog();
        let apple = find_product("Apple", &catalog);
        assert_eq!(apple.product.unwrap().name, "Apples");
        assert_eq!(apple.confidence, Confidence::Exact);

        let milks = find_product("milks", &catalog);
        assert_eq!(milks.product.unwrap().name, "Milk");
    }

    #[test]
    fn test_typo_resolves_with_medium_confidence() {
        let catalog = vec![Product::new("Apples", Decimal::new(120, 0), "kg", 30)];
        let result = find_product("aples", &catalog);
        assert_eq!(result.product.unwrap().name, "Apples");
        assert!(matches!(
            result.confidence,
            Confidence::High | Confidence::Medium
        ));
        assert_eq!(result.match_type, MatchType::Fuzzy);
    }

    #[test]
    fn test_truncated_name_resolves() {
        let catalog = catalog();
        let result = find_product("banan", &catalog);
        assert_eq!(result.product.unwrap().name, "Bananas");
    }

    #[test]
    fn test_decorated_query_is_cleaned() {
        let catalog = catalog();
        let result = find_product("fresh tomatoe", &catalog);
        assert_eq!(result.product.unwrap().name, "Tomatoes");
        assert_eq!(result.match_type, MatchType::Cleaned);
    }

    #[test]
    fn test_earlier_strategy_wins() {
        // "milk" is a substring of the Milk description too, but exact wins
        let catalog = catalog();
        let result = find_product("MILK", &catalog);
        assert_eq!(result.match_type, MatchType::Exact);
    }

    #[test]
    fn test_unrelated_query_returns_none() {
        let catalog = catalog();
        let result = find_product("zzzzqqq", &catalog);
        assert!(!result.is_resolved());
        assert_eq!(result.match_type, MatchType::None);
        assert!(result.alternatives.len() <= MAX_ALTERNATIVES);
    }

    #[test]
    fn test_empty_catalog() {
        let result = find_product("apples", &[]);
        assert!(!result.is_resolved());
        assert!(result.alternatives.is_empty());
    }
}
