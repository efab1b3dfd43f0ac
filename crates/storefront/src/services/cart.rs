//! Cart state accessor.
//!
//! The cart a shopper sees in the app can be stale by the time a tool runs
//! (edits in another tab, earlier tool calls in the same turn). Anything that
//! reports a total or makes a decision about the cart must go through
//! [`CartStateAccessor::fetch_latest`] immediately beforehand.

use freshcart_core::{CartLine, ProductId, UserId, cart_item_count, cart_total};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use crate::db::{GroceryStore, RepositoryError};

/// Errors reading cart state.
///
/// Callers must treat any of these as "cannot confirm cart state", never as
/// an empty cart.
#[derive(Debug, Error)]
pub enum CartStateError {
    #[error("no signed-in user")]
    Unauthenticated,

    #[error("failed to fetch cart: {0}")]
    Storage(#[from] RepositoryError),
}

/// A freshly fetched cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartState {
    pub items: Vec<CartLine>,
    /// Σ price × quantity.
    pub total_amount: Decimal,
    /// Σ quantity, not the number of distinct products.
    pub item_count: u32,
}

impl CartState {
    #[must_use]
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        Self {
            total_amount: cart_total(&items),
            item_count: cart_item_count(&items),
            items,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The line for `product`, if it is in the cart.
    #[must_use]
    pub fn line(&self, product: ProductId) -> Option<&CartLine> {
        self.items.iter().find(|line| line.product.id == product)
    }

    /// Quantity of `product` currently in the cart (zero if absent).
    #[must_use]
    pub fn quantity_of(&self, product: ProductId) -> u32 {
        self.line(product).map_or(0, |line| line.quantity)
    }

    /// Product names in cart order.
    #[must_use]
    pub fn product_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|line| line.product.name.as_str())
            .collect()
    }
}

/// Reads the authoritative cart from storage.
#[derive(Clone, Copy)]
pub struct CartStateAccessor<'a> {
    store: &'a dyn GroceryStore,
}

impl<'a> CartStateAccessor<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn GroceryStore) -> Self {
        Self { store }
    }

    /// Fetch the user's cart as it is right now.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when `user` is `None` and `Storage` when the
    /// fetch fails.
    #[instrument(skip(self), fields(user_id = ?user))]
    pub async fn fetch_latest(&self, user: Option<UserId>) -> Result<CartState, CartStateError> {
        let user = user.ok_or(CartStateError::Unauthenticated)?;
        let lines = self.store.fetch_cart_items(user).await?;
        Ok(CartState::from_lines(lines))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshcart_core::Product;

    use super::*;
    use crate::db::{FailPoint, MemoryStore};

    #[tokio::test]
    async fn test_fetch_latest_totals() {
        let apples = Product::new("Apples", Decimal::new(120, 0), "kg", 30);
        let milk = Product::new("Milk", Decimal::new(60, 0), "litre", 20);
        let store = MemoryStore::with_products(vec![apples.clone(), milk.clone()]);
        let user = UserId::random();
        store.insert_cart_item(user, apples.id, 2).await.unwrap();
        store.insert_cart_item(user, milk.id, 1).await.unwrap();

        let cart = CartStateAccessor::new(&store)
            .fetch_latest(Some(user))
            .await
            .unwrap();
        assert_eq!(cart.total_amount, Decimal::new(300, 0));
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.quantity_of(apples.id), 2);
        assert_eq!(cart.product_names(), vec!["Apples", "Milk"]);
    }

    #[tokio::test]
    async fn test_unauthenticated_is_an_error() {
        let store = MemoryStore::new();
        let err = CartStateAccessor::new(&store)
            .fetch_latest(None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartStateError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_an_empty_cart() {
        let store = MemoryStore::new();
        store.fail(FailPoint::FetchCartItems).unwrap();
        let err = CartStateAccessor::new(&store)
            .fetch_latest(Some(UserId::random()))
            .await
            .unwrap_err();
        assert!(matches!(err, CartStateError::Storage(_)));
    }

    #[tokio::test]
    async fn test_lines_follow_current_product_price() {
        let apples = Product::new("Apples", Decimal::new(120, 0), "kg", 30);
        let store = MemoryStore::with_products(vec![apples.clone()]);
        let user = UserId::random();
        store.insert_cart_item(user, apples.id, 1).await.unwrap();
        store
            .upsert_product(Product {
                id: apples.id,
                ..Product::new("Green Apples", Decimal::new(140, 0), "kg", 5)
            })
            .unwrap();

        let cart = CartStateAccessor::new(&store)
            .fetch_latest(Some(user))
            .await
            .unwrap();
        // The row follows the product's current price
        assert_eq!(cart.total_amount, Decimal::new(140, 0));
    }
}
