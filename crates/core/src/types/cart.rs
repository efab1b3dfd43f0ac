//! Cart lines and cart arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::Product;

/// One row of a shopper's cart joined with its product.
///
/// Rows are unique per (user, product) and always carry a positive quantity;
/// a quantity of zero is represented by the row not existing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line at the product's current price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Sum of `price × quantity` over all lines.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Sum of quantities over all lines (not the number of distinct products).
#[must_use]
pub fn cart_item_count(lines: &[CartLine]) -> u32 {
    lines
        .iter()
        .fold(0_u32, |acc, line| acc.saturating_add(line.quantity))
}
