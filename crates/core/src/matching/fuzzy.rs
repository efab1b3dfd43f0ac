//! Weighted approximate string search over the catalog.
//!
//! Each searchable field is scored by the smallest edit distance between the
//! query and any substring of the field, divided by the query length
//! (0.0 = the query appears verbatim, 1.0 = nothing in common). A field whose
//! distance is at or under the threshold matches; its relevance
//! (`1 - distance`) is scaled by the field weight relative to the name, and
//! the most relevant field decides the product's score. With weights 0.8/0.2
//! a perfect description hit scores 0.75, worse than any name match.

use crate::types::Product;

use super::index::{CatalogIndex, IndexedProduct};
use super::normalize::normalize;

/// Per-field distance above which a field does not match.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Weight of the product name in the combined score.
pub const NAME_WEIGHT: f64 = 0.8;

/// Weight of the product description in the combined score.
pub const DESCRIPTION_WEIGHT: f64 = 0.2;

/// Queries shorter than this never produce fuzzy matches.
pub const MIN_MATCH_CHARS: usize = 2;

/// A catalog entry with its combined distance score (lower is better).
#[derive(Debug, Clone, Copy)]
pub struct Scored<'a> {
    pub product: &'a Product,
    pub score: f64,
}

/// Approximate search configuration.
#[derive(Debug, Clone, Copy)]
pub struct FuzzySearch {
    threshold: f64,
}

impl Default for FuzzySearch {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl FuzzySearch {
    /// Score every product against `query` and return the matches, best
    /// first. Equal scores keep catalog order.
    #[must_use]
    pub fn search<'a>(&self, query: &str, catalog: &'a [Product]) -> Vec<Scored<'a>> {
        self.search_index(query, &CatalogIndex::new(catalog))
    }

    /// [`Self::search`] over a catalog whose fields are already normalised.
    #[must_use]
    pub fn search_index<'a>(&self, query: &str, index: &CatalogIndex<'a>) -> Vec<Scored<'a>> {
        let query: Vec<char> = normalize(query).chars().collect();
        if query.len() < MIN_MATCH_CHARS {
            return Vec::new();
        }

        let mut hits: Vec<Scored<'a>> = index
            .iter()
            .filter_map(|entry| {
                self.score_entry(&query, entry).map(|score| Scored {
                    product: entry.product,
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }

    /// Combined score for one product, or `None` if no field matched.
    fn score_entry(&self, query: &[char], entry: &IndexedProduct<'_>) -> Option<f64> {
        let name = Some(field_distance(query, &entry.name_chars));
        let description = entry
            .description
            .as_deref()
            .map(|d| field_distance(query, d));

        [(name, NAME_WEIGHT), (description, DESCRIPTION_WEIGHT)]
            .into_iter()
            .filter_map(|(distance, weight)| {
                distance
                    .filter(|d| *d <= self.threshold)
                    .map(|d| (1.0 - d) * (weight / NAME_WEIGHT))
            })
            .max_by(f64::total_cmp)
            .map(|relevance| 1.0 - relevance)
    }
}

/// Normalised approximate-substring distance of `query` within `text`.
///
/// `text` must already be normalised.
#[must_use]
pub fn field_distance(query: &[char], text: &[char]) -> f64 {
    if query.is_empty() || text.is_empty() {
        return 1.0;
    }

    let edits = substring_edits(query, text);

    #[allow(clippy::cast_precision_loss)] // bounded by the request length cap
    let distance = edits as f64 / query.len() as f64;
    distance.min(1.0)
}

/// Smallest Levenshtein distance between `pattern` and any substring of
/// `text`, in `O(pattern * text)` time and `O(text)` space.
///
/// Standard edit-distance DP, except the match may start anywhere in `text`
/// (the first row is all zeros) and end anywhere (minimum of the last row).
fn substring_edits(pattern: &[char], text: &[char]) -> usize {
    let mut prev = vec![0usize; text.len() + 1];
    let mut row = Vec::with_capacity(text.len() + 1);

    for (i, &p) in pattern.iter().enumerate() {
        row.clear();
        let mut left = i + 1;
        row.push(left);
        for ((&diag, &up), &t) in prev.iter().zip(prev.iter().skip(1)).zip(text) {
            left = (up + 1).min(left + 1).min(diag + usize::from(p != t));
            row.push(left);
        }
        std::mem::swap(&mut prev, &mut row);
    }

    prev.into_iter().min().unwrap_or(pattern.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(name: &str) -> Product {
        Product::new(name, Decimal::new(100, 0), "kg", 10)
    }

    fn distance(query: &str, text: &str) -> f64 {
        let query: Vec<char> = query.chars().collect();
        let text: Vec<char> = text.chars().collect();
        field_distance(&query, &text)
    }

    /// Every window of `text` compared with `pattern` in full.
    fn windowed_edits(pattern: &str, text: &str) -> usize {
        let chars: Vec<char> = text.chars().collect();
        let mut best = pattern.chars().count();
        for start in 0..=chars.len() {
            for end in start..=chars.len() {
                let window: String = chars.iter().skip(start).take(end - start).collect();
                best = best.min(strsim::levenshtein(pattern, &window));
            }
        }
        best
    }

    #[test]
    fn test_field_distance_verbatim_substring_is_zero() {
        assert!(distance("banan", "bananas").abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_distance_single_typo() {
        let d = distance("aples", "apples");
        assert!((d - 0.2).abs() < 1e-9, "got {d}");
    }

    #[test]
    fn test_field_distance_unrelated() {
        assert!(distance("xyz", "apples") > DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_substring_edits_agree_with_windowed_levenshtein() {
        let cases = [
            ("aples", "red apples"),
            ("tomatoe", "tomatoes"),
            ("flour", "flor atta"),
            ("carot", "carom seeds"),
            ("milk", "full cream cow milk"),
            ("pakora", "pa"),
            ("xyz", "apples"),
        ];
        for (pattern, text) in cases {
            let p: Vec<char> = pattern.chars().collect();
            let t: Vec<char> = text.chars().collect();
            assert_eq!(
                substring_edits(&p, &t),
                windowed_edits(pattern, text),
                "{pattern} in {text}"
            );
        }
    }

    #[test]
    fn test_long_query_over_long_descriptions_is_fast() {
        let description = "hand picked seasonal produce from partner farms, washed, graded \
                           and packed the same morning for delivery across the city today";
        let catalog: Vec<Product> = (0..200)
            .map(|i| product(&format!("Item {i}")).with_description(description))
            .collect();
        let query = "q".repeat(100);

        let started = std::time::Instant::now();
        let hits = FuzzySearch::default().search(&query, &catalog);
        assert!(hits.is_empty());
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_short_queries_do_not_match() {
        let catalog = vec![product("Apples")];
        assert!(FuzzySearch::default().search("a", &catalog).is_empty());
    }

    #[test]
    fn test_best_field_relevance_decides_score() {
        // Name "flor" is one edit from "flour" (relevance 0.8); the exact
        // description hit is worth only 0.2 / 0.8 = 0.25, so the name decides.
        let catalog = vec![
            product("Flor Atta").with_description("Whole wheat flour"),
            product("Brown Bread").with_description("Whole wheat flour"),
        ];
        let hits = FuzzySearch::default().search("flour", &catalog);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.first().unwrap().product.name, "Flor Atta");
        assert!((hits.first().unwrap().score - 0.2).abs() < 1e-9);
        assert_eq!(hits.last().unwrap().product.name, "Brown Bread");
        assert!((hits.last().unwrap().score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_name_outweighs_description() {
        let catalog = vec![
            product("Brown Bread").with_description("Made with whole wheat flour"),
            product("Wheat Flour"),
        ];
        let hits = FuzzySearch::default().search("flour", &catalog);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.first().unwrap().product.name, "Wheat Flour");
    }

    #[test]
    fn test_results_sorted_best_first() {
        let catalog = vec![product("Carrots"), product("Carom Seeds"), product("Carrot Cake")];
        let hits = FuzzySearch::default().search("carot", &catalog);
        assert!(!hits.is_empty());
        assert!(hits.windows(2).all(|w| match w {
            [a, b] => a.score <= b.score,
            _ => true,
        }));
        assert!(hits.first().unwrap().product.name.starts_with("Carrot"));
    }
}
