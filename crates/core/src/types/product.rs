//! Catalog entities: products and categories.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A product category (read-only reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// The slice of a category joined onto a product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
}

/// A product as seen in the catalog snapshot.
///
/// Only `stock_quantity` ever changes underneath us, and that happens in the
/// storage layer when orders are fulfilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the store currency.
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Option<CategoryRef>,
    pub stock_quantity: u32,
    /// Unit label such as "kg", "litre" or "piece".
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a product with a fresh ID and no description, image or category.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        unit: impl Into<String>,
        stock_quantity: u32,
    ) -> Self {
        Self {
            id: ProductId::random(),
            name: name.into(),
            description: None,
            price,
            image_url: None,
            category: None,
            stock_quantity,
            unit: unit.into(),
            created_at: Utc::now(),
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a category.
    #[must_use]
    pub fn with_category(mut self, id: CategoryId, name: impl Into<String>) -> Self {
        self.category = Some(CategoryRef {
            id,
            name: name.into(),
        });
        self
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }
}
