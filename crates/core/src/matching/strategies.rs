//! The individual matching strategies.
//!
//! Each strategy is a pure function that either returns a definite
//! [`MatchResult`] or `None` ("no opinion"). [`super::find_product`] runs them
//! in [`CASCADE`] order and stops at the first definite answer.

use crate::types::{Confidence, MatchType, Product};

use super::fuzzy::{FuzzySearch, Scored};
use super::index::CatalogIndex;
use super::normalize::{char_prefix, plural_variants, tokens};
use super::{MAX_ALTERNATIVES, MatchQuery, MatchResult};

/// Upper score bound for a fuzzy hit to be offered as an alternative.
pub const ALTERNATIVE_MAX_SCORE: f64 = 0.5;

/// Fuzzy scores at or under this are `high` confidence.
pub const HIGH_CONFIDENCE_MAX_SCORE: f64 = 0.10;

/// Fuzzy scores at or under this are `medium` confidence.
pub const MEDIUM_CONFIDENCE_MAX_SCORE: f64 = 0.30;

/// Minimum word length considered by the partial strategy.
const PARTIAL_MIN_WORD_CHARS: usize = 3;

/// Signature shared by all strategies.
pub type Strategy = for<'a> fn(&MatchQuery, &CatalogIndex<'a>) -> Option<MatchResult<'a>>;

/// Strategies in precedence order. An earlier strategy always wins over a
/// later one, however good the later match looks.
pub const CASCADE: [Strategy; 5] = [exact, plural, cleaned, fuzzy, partial];

/// Case-insensitive equality with a product name.
pub fn exact<'a>(query: &MatchQuery, catalog: &CatalogIndex<'a>) -> Option<MatchResult<'a>> {
    let hit = pick_by_stock(catalog, |name| name == query.normalized)?;
    Some(hit.into_result(Confidence::Exact, MatchType::Exact))
}

/// Equality after adding or removing a trailing "s".
pub fn plural<'a>(query: &MatchQuery, catalog: &CatalogIndex<'a>) -> Option<MatchResult<'a>> {
    let hit = plural_hit(&query.normalized, catalog)?;
    Some(hit.into_result(Confidence::Exact, MatchType::Plural))
}

/// Exact or singular/plural equality after stripping decoration words.
pub fn cleaned<'a>(query: &MatchQuery, catalog: &CatalogIndex<'a>) -> Option<MatchResult<'a>> {
    let cleaned = query.cleaned.as_deref()?;
    let hit = pick_by_stock(catalog, |name| name == cleaned)
        .or_else(|| plural_hit(cleaned, catalog))?;
    Some(hit.into_result(Confidence::High, MatchType::Cleaned))
}

/// Approximate search, confidence derived from the best score.
pub fn fuzzy<'a>(query: &MatchQuery, catalog: &CatalogIndex<'a>) -> Option<MatchResult<'a>> {
    let hits = FuzzySearch::default().search_index(query.search_text(), catalog);
    let (best, rest) = hits.split_first()?;

    let alternatives = rest
        .iter()
        .filter(|hit| hit.score <= ALTERNATIVE_MAX_SCORE)
        .take(MAX_ALTERNATIVES)
        .map(|hit| hit.product)
        .collect();

    Some(MatchResult {
        product: Some(best.product),
        confidence: confidence_for_score(best.score),
        alternatives,
        match_type: MatchType::Fuzzy,
        score: Some(best.score),
    })
}

/// Word-level overlap: substring containment or a shared 3-letter prefix.
pub fn partial<'a>(query: &MatchQuery, catalog: &CatalogIndex<'a>) -> Option<MatchResult<'a>> {
    let words: Vec<&str> = tokens(&query.normalized)
        .filter(|w| w.chars().count() >= PARTIAL_MIN_WORD_CHARS)
        .collect();
    if words.is_empty() {
        return None;
    }

    let mut matches = catalog
        .iter()
        .filter(|entry| {
            tokens(&entry.name).any(|token| words.iter().any(|word| tokens_overlap(word, token)))
        })
        .map(|entry| entry.product);

    let first = matches.next()?;
    Some(MatchResult {
        product: Some(first),
        confidence: Confidence::Low,
        alternatives: matches.take(MAX_ALTERNATIVES).collect(),
        match_type: MatchType::Partial,
        score: None,
    })
}

/// Suggestions for a query nothing matched: fuzzy hits on the first word plus
/// products with a name token sharing its first two characters.
#[must_use]
pub fn suggestions<'a>(query: &MatchQuery, catalog: &CatalogIndex<'a>) -> Vec<&'a Product> {
    let Some(first_word) = tokens(&query.normalized).next() else {
        return Vec::new();
    };

    let mut picked: Vec<&'a Product> = FuzzySearch::default()
        .search_index(first_word, catalog)
        .into_iter()
        .map(|Scored { product, .. }| product)
        .collect();

    let stem = char_prefix(first_word, 2);
    if stem.chars().count() == 2 {
        for entry in catalog.iter() {
            if tokens(&entry.name).any(|t| t.starts_with(stem)) {
                picked.push(entry.product);
            }
        }
    }

    let mut seen = Vec::with_capacity(MAX_ALTERNATIVES);
    picked.retain(|p| {
        if seen.contains(&p.id) {
            false
        } else {
            seen.push(p.id);
            true
        }
    });
    picked.truncate(MAX_ALTERNATIVES);
    picked
}

/// Map a fuzzy score onto a confidence tier.
#[must_use]
pub fn confidence_for_score(score: f64) -> Confidence {
    if score <= HIGH_CONFIDENCE_MAX_SCORE {
        Confidence::High
    } else if score <= MEDIUM_CONFIDENCE_MAX_SCORE {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// A chosen product plus the other products that matched equally well.
struct Hit<'a> {
    product: &'a Product,
    others: Vec<&'a Product>,
}

impl<'a> Hit<'a> {
    fn into_result(self, confidence: Confidence, match_type: MatchType) -> MatchResult<'a> {
        MatchResult {
            product: Some(self.product),
            confidence,
            alternatives: self.others,
            match_type,
            score: None,
        }
    }
}

/// All products whose normalised name satisfies `predicate`. When several
/// qualify the one with the most stock wins, earlier catalog entries winning
/// ties; the rest are kept as alternatives.
fn pick_by_stock<'a>(
    catalog: &CatalogIndex<'a>,
    predicate: impl Fn(&str) -> bool,
) -> Option<Hit<'a>> {
    let candidates: Vec<&'a Product> = catalog
        .iter()
        .filter(|entry| predicate(&entry.name))
        .map(|entry| entry.product)
        .collect();

    let mut best: Option<&'a Product> = None;
    for &candidate in &candidates {
        if best.is_none_or(|b| candidate.stock_quantity > b.stock_quantity) {
            best = Some(candidate);
        }
    }
    let product = best?;

    let others = candidates
        .into_iter()
        .filter(|p| p.id != product.id)
        .take(MAX_ALTERNATIVES)
        .collect();
    Some(Hit { product, others })
}

fn plural_hit<'a>(normalized: &str, catalog: &CatalogIndex<'a>) -> Option<Hit<'a>> {
    let variants = plural_variants(normalized);
    pick_by_stock(catalog, |name| variants.iter().any(|v| v == name))
}

fn tokens_overlap(word: &str, token: &str) -> bool {
    if token.chars().count() < PARTIAL_MIN_WORD_CHARS {
        return false;
    }
    token.contains(word)
        || word.contains(token)
        || char_prefix(word, PARTIAL_MIN_WORD_CHARS) == char_prefix(token, PARTIAL_MIN_WORD_CHARS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(name: &str, stock: u32) -> Product {
        Product::new(name, Decimal::new(50, 0), "piece", stock)
    }

    fn name_of(result: &MatchResult<'_>) -> String {
        result.product.map(|p| p.name.clone()).unwrap_or_default()
    }

    #[test]
    fn test_exact_ignores_case_and_padding() {
        let catalog = vec![product("Whole Milk", 4)];
        let result = exact(&MatchQuery::new("  whole MILK "), &CatalogIndex::new(&catalog)).unwrap();
        assert_eq!(name_of(&result), "Whole Milk");
        assert_eq!(result.confidence, Confidence::Exact);
    }

    #[test]
    fn test_exact_has_no_opinion_on_typos() {
        let catalog = vec![product("Whole Milk", 4)];
        assert!(exact(&MatchQuery::new("whole mlk"), &CatalogIndex::new(&catalog)).is_none());
    }

    #[test]
    fn test_exact_ambiguity_prefers_stock_then_order() {
        let catalog = vec![product("Eggs", 2), product("eggs", 9), product("EGGS", 9)];
        let result = exact(&MatchQuery::new("eggs"), &CatalogIndex::new(&catalog)).unwrap();
        let chosen = result.product.unwrap();
        assert_eq!(chosen.id, catalog.get(1).unwrap().id);
        assert_eq!(result.alternatives.len(), 2);
    }

    #[test]
    fn test_plural_both_directions() {
        let catalog = vec![product("Apples", 30), product("Onion", 10)];
        let apples = plural(&MatchQuery::new("apple"), &CatalogIndex::new(&catalog)).unwrap();
        assert_eq!(name_of(&apples), "Apples");
        let onion = plural(&MatchQuery::new("onions"), &CatalogIndex::new(&catalog)).unwrap();
        assert_eq!(name_of(&onion), "Onion");
        assert_eq!(onion.match_type, MatchType::Plural);
    }

    #[test]
    fn test_cleaned_strips_decorations() {
        let catalog = vec![product("Tomatoes", 12)];
        let result = cleaned(&MatchQuery::new("fresh tomatoe"), &CatalogIndex::new(&catalog)).unwrap();
        assert_eq!(name_of(&result), "Tomatoes");
        assert_eq!(result.confidence, Confidence::High);
        assert_eq!(result.match_type, MatchType::Cleaned);
    }

    #[test]
    fn test_cleaned_skips_undecorated_queries() {
        let catalog = vec![product("Tomatoes", 12)];
        assert!(cleaned(&MatchQuery::new("tomatoes"), &CatalogIndex::new(&catalog)).is_none());
    }

    #[test]
    fn test_fuzzy_confidence_tiers() {
        assert_eq!(confidence_for_score(0.0), Confidence::High);
        assert_eq!(confidence_for_score(0.10), Confidence::High);
        assert_eq!(confidence_for_score(0.25), Confidence::Medium);
        assert_eq!(confidence_for_score(0.30), Confidence::Medium);
        assert_eq!(confidence_for_score(0.45), Confidence::Low);
    }

    #[test]
    fn test_fuzzy_collects_alternatives() {
        let catalog = vec![
            product("Green Grapes", 5),
            product("Black Grapes", 5),
            product("Grapefruit", 5),
            product("Garlic", 5),
        ];
        let result = fuzzy(&MatchQuery::new("grapes"), &CatalogIndex::new(&catalog)).unwrap();
        assert_eq!(name_of(&result), "Green Grapes");
        assert!(result.alternatives.iter().any(|p| p.name == "Black Grapes"));
        assert!(result.alternatives.len() <= MAX_ALTERNATIVES);
    }

    #[test]
    fn test_partial_shared_prefix() {
        let catalog = vec![product("Basmati Rice", 5), product("Potato Chips", 5)];
        let result = partial(&MatchQuery::new("potatos wafers"), &CatalogIndex::new(&catalog)).unwrap();
        assert_eq!(name_of(&result), "Potato Chips");
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_partial_ignores_short_words() {
        let catalog = vec![product("Ox Tail", 5)];
        assert!(partial(&MatchQuery::new("ox"), &CatalogIndex::new(&catalog)).is_none());
    }

    #[test]
    fn test_suggestions_union_and_cap() {
        let catalog = vec![
            product("Paneer", 5),
            product("Papaya", 5),
            product("Pasta", 5),
            product("Peas", 5),
            product("Parsley", 5),
        ];
        let picks = suggestions(&MatchQuery::new("pakora mix"), &CatalogIndex::new(&catalog));
        assert_eq!(picks.len(), MAX_ALTERNATIVES);
        assert!(picks.iter().all(|p| p.name.to_lowercase().starts_with("pa")));
    }
}
