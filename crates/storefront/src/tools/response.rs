//! The uniform tool response envelope.
//!
//! Every tool answers with `{ success, message, error?, ...fields }`. The
//! message is always written for the shopper; `error` is a stable code for
//! the conversational host. Amounts are decimal strings with two places and
//! always travel with a `currency` code.

use chrono::{DateTime, Utc};
use freshcart_core::{
    CartLine, Confidence, CurrencyCode, MatchType, Order, OrderId, OrderItem, OrderStatus, Price,
    Product, ProductId, ProfileGap,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::error;

use super::error::{ErrorCode, ToolError};
use crate::services::{CartState, OrderError};

/// Response envelope returned by every tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(flatten)]
    pub payload: Option<ToolPayload>,
}

impl ToolResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>, payload: ToolPayload) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            payload: Some(payload),
        }
    }

    #[must_use]
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(code),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: ToolPayload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// The cart carried by this response, if any.
    #[must_use]
    pub fn cart(&self) -> Option<&CartView> {
        match &self.payload {
            Some(ToolPayload::Cart(cart)) => Some(cart),
            Some(ToolPayload::CartChange(change)) => Some(&change.cart),
            Some(ToolPayload::OrderPlaced(placed)) => placed.cart.as_ref(),
            _ => None,
        }
    }
}

/// Operation-specific fields, flattened into the envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolPayload {
    Cart(CartView),
    CartChange(CartChangeView),
    Products(ProductListView),
    History(HistoryView),
    OrderPlaced(OrderPlacedView),
    UserStatus(UserStatusView),
    Suggestions(SuggestionsView),
    Stock(StockView),
    CartContents(CartContentsView),
    MissingProfile(MissingProfileView),
}

// =============================================================================
// Views
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_amount: Decimal,
    pub item_count: u32,
    pub currency: CurrencyCode,
    pub is_empty: bool,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &CartState, currency: CurrencyCode) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            total_amount: money(cart.total_amount),
            item_count: cart.item_count,
            currency,
            is_empty: cart.is_empty(),
        }
    }

    /// Quantity of the named product in this view (zero if absent).
    #[must_use]
    pub fn quantity_of(&self, product_name: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.name == product_name)
            .map_or(0, |item| item.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit: String,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id,
            name: line.product.name.clone(),
            quantity: line.quantity,
            unit: line.product.unit.clone(),
            unit_price: money(line.product.price),
            line_total: money(line.line_total()),
        }
    }
}

/// The product a free-text reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedProduct {
    pub product_id: ProductId,
    pub name: String,
    pub confidence: Confidence,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartChangeView {
    pub product: MatchedProduct,
    /// Quantity of the product in the cart after the change.
    pub quantity_in_cart: u32,
    pub cart: CartView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub unit: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: money(product.price),
            unit: product.unit.clone(),
            category: product.category_name().map(str::to_string),
            description: product.description.clone(),
            stock_quantity: product.stock_quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<ProductView>,
    pub count: usize,
    pub currency: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub item_count: u32,
    pub delivery_address: String,
    pub items: Vec<OrderItemView>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            created_at: order.created_at,
            status: order.status,
            total_amount: money(order.total_amount),
            item_count: order.unit_count(),
            delivery_address: order.delivery_address.clone(),
            items: order.items.iter().map(OrderItemView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            product_name: item
                .product_name
                .clone()
                .unwrap_or_else(|| "Unavailable product".to_string()),
            quantity: item.quantity,
            unit_price: money(item.price),
            line_total: money(item.line_total()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub orders: Vec<OrderView>,
    pub count: usize,
    pub currency: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedView {
    pub order_id: OrderId,
    pub total_amount: Decimal,
    pub item_count: u32,
    pub currency: CurrencyCode,
    pub cart_cleared: bool,
    pub cart: Option<CartView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusView {
    pub signed_in: bool,
    pub cart_item_count: u32,
    pub cart_total: Decimal,
    pub currency: CurrencyCode,
    /// Phone and address are both usable for delivery.
    pub profile_complete: bool,
    pub missing_details: Vec<ProfileGap>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsView {
    pub query: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub product: String,
    pub available: u32,
    pub requested: u32,
    pub in_cart: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartContentsView {
    pub product: String,
    pub cart_items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingProfileView {
    pub missing: Vec<ProfileGap>,
}

// =============================================================================
// Failures
// =============================================================================

impl From<ToolError> for ToolResponse {
    fn from(err: ToolError) -> Self {
        let code = err.code();
        if err.is_dependency_failure() {
            error!(error = %err, "Tool call failed on a dependency");
        }

        match err {
            ToolError::UnknownTool(name) => Self::failure(
                code,
                format!("I can't do \"{name}\". Ask me about your cart, products or orders."),
            ),
            ToolError::InvalidArguments(message) => Self::failure(code, message),
            ToolError::NegativeQuantity(_) => Self::failure(
                code,
                "Quantity can't be negative. To take an item out of your cart, ask me to remove it instead.",
            ),
            ToolError::Unauthenticated => Self::failure(
                code,
                "Please sign in first so I can look after your cart and orders.",
            ),
            ToolError::ProductNotFound { query, suggestions } => {
                let message = if suggestions.is_empty() {
                    format!(
                        "I couldn't find \"{query}\" in the store. Try another name, or ask me what's available."
                    )
                } else {
                    format!(
                        "I couldn't find \"{query}\". Did you mean {}?",
                        join_alternatives(&suggestions)
                    )
                };
                Self::failure(code, message).with_payload(ToolPayload::Suggestions(
                    SuggestionsView { query, suggestions },
                ))
            }
            ToolError::NotInCart {
                product,
                cart_items,
            } => {
                let message = if cart_items.is_empty() {
                    format!("{product} isn't in your cart, and your cart is empty.")
                } else {
                    format!(
                        "{product} isn't in your cart. Your cart has {}.",
                        cart_items.join(", ")
                    )
                };
                Self::failure(code, message).with_payload(ToolPayload::CartContents(
                    CartContentsView {
                        product,
                        cart_items,
                    },
                ))
            }
            ToolError::InsufficientStock {
                product,
                available,
                requested,
                in_cart,
            } => {
                let mut message = format!("Sorry, only {available} available for {product}.");
                if in_cart > 0 {
                    message.push_str(&format!(" You already have {in_cart} in your cart."));
                }
                message.push_str(" Please try a smaller quantity.");
                Self::failure(code, message).with_payload(ToolPayload::Stock(StockView {
                    product,
                    available,
                    requested,
                    in_cart,
                }))
            }
            ToolError::EmptyCart => Self::failure(
                code,
                "Your cart is empty. Add some items before placing an order.",
            ),
            ToolError::IncompleteProfile(missing) => {
                let steps: Vec<&str> = missing.iter().map(|gap| gap.guidance()).collect();
                Self::failure(
                    code,
                    format!(
                        "Before I can place your order, please update your profile: {}.",
                        steps.join("; ")
                    ),
                )
                .with_payload(ToolPayload::MissingProfile(MissingProfileView { missing }))
            }
            ToolError::NoOrders { order_id: Some(_) } => {
                Self::failure(code, "I couldn't find that order in your history.")
            }
            ToolError::NoOrders { order_id: None } => {
                Self::failure(code, "You haven't placed any orders yet.")
            }
            ToolError::Order(OrderError::RollbackFailed { .. }) => Self::failure(
                code,
                "Something went wrong while placing your order. Please contact support before trying again.",
            ),
            ToolError::Storage(_) | ToolError::Order(_) => Self::failure(
                code,
                "Something went wrong on our side. Please try again in a moment.",
            ),
        }
    }
}

// =============================================================================
// Formatting helpers
// =============================================================================

/// Round to two decimal places and keep the trailing zeros ("300.00").
#[must_use]
pub fn money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Human-readable amount, e.g. "₹300.00".
#[must_use]
pub fn format_amount(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).to_string()
}

/// "a", "a or b", "a, b or c".
fn join_alternatives(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}
