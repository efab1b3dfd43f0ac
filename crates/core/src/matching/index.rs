//! Catalog fields normalised once per lookup.

use crate::types::Product;

use super::normalize::normalize;

/// One product with its matchable text pre-normalised.
#[derive(Debug, Clone)]
pub struct IndexedProduct<'a> {
    pub product: &'a Product,
    /// Normalised name.
    pub name: String,
    pub name_chars: Vec<char>,
    /// Normalised description, as characters.
    pub description: Option<Vec<char>>,
}

/// A borrowed catalog ready for matching. Order follows the catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex<'a> {
    entries: Vec<IndexedProduct<'a>>,
}

impl<'a> CatalogIndex<'a> {
    #[must_use]
    pub fn new(catalog: &'a [Product]) -> Self {
        let entries = catalog
            .iter()
            .map(|product| {
                let name = normalize(&product.name);
                IndexedProduct {
                    product,
                    name_chars: name.chars().collect(),
                    name,
                    description: product
                        .description
                        .as_deref()
                        .map(|d| normalize(d).chars().collect()),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedProduct<'a>> {
        self.entries.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_fields_are_normalised_in_catalog_order() {
        let catalog = vec![
            Product::new("  Brown   BREAD ", Decimal::new(45, 0), "loaf", 8)
                .with_description("Whole WHEAT"),
            Product::new("Milk", Decimal::new(60, 0), "litre", 20),
        ];
        let index = CatalogIndex::new(&catalog);
        let names: Vec<&str> = index.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["brown bread", "milk"]);

        let described: Vec<bool> = index.iter().map(|e| e.description.is_some()).collect();
        assert_eq!(described, [true, false]);
    }
}
