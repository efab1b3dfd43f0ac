//! Orders and their frozen line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::{OrderId, OrderItemId, ProductId, UserId};
use super::profile::DeliveryProfile;
use super::status::OrderStatus;

/// A placed order with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: Decimal,
    pub delivery_address: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Total number of units across all items.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity))
    }
}

/// A line of a placed order.
///
/// `price` is the unit price captured when the order was placed. It is never
/// recomputed from the product's current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    /// Product name at read time, if the product still exists.
    pub product_name: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Values for inserting an order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub total_amount: Decimal,
    pub delivery: DeliveryProfile,
    pub status: OrderStatus,
}

/// Values for inserting one order item row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

impl From<&CartLine> for NewOrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            quantity: line.quantity,
            price: line.product.price,
        }
    }
}
