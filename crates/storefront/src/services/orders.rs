//! Order placement workflow.
//!
//! Placing an order is a sequence of independent storage writes with a
//! compensating action:
//!
//! 1. Recompute the total from the cart lines handed in.
//! 2. Insert the order row (`Pending`).
//! 3. Insert the items with their current unit prices.
//! 4. If step 3 fails, delete the order row so no order exists without items.
//! 5. Clear the cart (retried once; failure is a warning, not an order failure).
//! 6. Re-read the cart for the response.

use freshcart_core::{
    CartLine, DeliveryProfile, NewOrder, NewOrderItem, OrderId, OrderStatus, UserId,
    cart_item_count, cart_total,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use super::cart::{CartState, CartStateAccessor};
use crate::db::{GroceryStore, RepositoryError};

/// Attempts made at clearing the cart after an order is stored.
const CART_CLEAR_ATTEMPTS: u32 = 2;

/// Errors placing an order. When any of these is returned, no order exists,
/// except for [`OrderError::RollbackFailed`].
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("cannot place an order for an empty cart")]
    EmptyCart,

    #[error("failed to create order: {0}")]
    CreateOrder(#[source] RepositoryError),

    #[error("failed to create items for order {order_id}; order was rolled back: {source}")]
    CreateItems {
        order_id: OrderId,
        #[source]
        source: RepositoryError,
    },

    /// The order row exists without its items and needs manual cleanup.
    #[error(
        "failed to create items for order {order_id} ({items_error}) and rollback failed: {source}"
    )]
    RollbackFailed {
        order_id: OrderId,
        items_error: RepositoryError,
        #[source]
        source: RepositoryError,
    },
}

/// A successfully stored order.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub total_amount: Decimal,
    /// Total units ordered.
    pub item_count: u32,
    /// Distinct products ordered.
    pub line_count: usize,
    /// Whether the cart was emptied after the order was stored.
    pub cart_cleared: bool,
    /// The cart as re-read after placement, if the read succeeded.
    pub remaining_cart: Option<CartState>,
}

impl PlacedOrder {
    /// A warning to surface alongside the successful order, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&'static str> {
        if !self.cart_cleared {
            return Some(
                "Your order was placed, but your cart could not be emptied. \
                 Please clear it before ordering again to avoid a duplicate order.",
            );
        }
        if self.remaining_cart.as_ref().is_some_and(|c| !c.is_empty()) {
            return Some("Your order was placed, but some items are still showing in your cart.");
        }
        None
    }
}

/// Runs the order placement workflow against a store.
#[derive(Clone, Copy)]
pub struct OrderPlacement<'a> {
    store: &'a dyn GroceryStore,
}

impl<'a> OrderPlacement<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn GroceryStore) -> Self {
        Self { store }
    }

    /// Place an order for `items`, which must be the cart just fetched.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCart` for no items, `CreateOrder` if the order row could
    /// not be stored, `CreateItems` if the items failed and the order was
    /// rolled back, and `RollbackFailed` if the rollback failed as well.
    #[instrument(skip(self, delivery, items), fields(user_id = %user, lines = items.len()))]
    pub async fn place(
        &self,
        user: UserId,
        delivery: &DeliveryProfile,
        items: &[CartLine],
    ) -> Result<PlacedOrder, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let total_amount = cart_total(items);
        let new_order = NewOrder {
            total_amount,
            delivery: delivery.clone(),
            status: OrderStatus::Pending,
        };
        let order_id = self
            .store
            .insert_order(user, &new_order)
            .await
            .map_err(OrderError::CreateOrder)?;

        let order_items: Vec<NewOrderItem> = items.iter().map(NewOrderItem::from).collect();
        if let Err(items_error) = self.store.insert_order_items(order_id, &order_items).await {
            warn!(%order_id, error = %items_error, "Order item insert failed, rolling back order");
            return match self.store.delete_order(order_id).await {
                Ok(()) => Err(OrderError::CreateItems {
                    order_id,
                    source: items_error,
                }),
                Err(rollback_error) => {
                    error!(
                        %order_id,
                        items_error = %items_error,
                        rollback_error = %rollback_error,
                        "Order rollback failed; order exists without items"
                    );
                    Err(OrderError::RollbackFailed {
                        order_id,
                        items_error,
                        source: rollback_error,
                    })
                }
            };
        }

        let cart_cleared = self.clear_cart(user).await;
        let remaining_cart = match CartStateAccessor::new(self.store)
            .fetch_latest(Some(user))
            .await
        {
            Ok(cart) => Some(cart),
            Err(e) => {
                warn!(%order_id, error = %e, "Could not re-read cart after placing order");
                None
            }
        };

        info!(%order_id, total = %total_amount, "Order placed");
        Ok(PlacedOrder {
            order_id,
            total_amount,
            item_count: cart_item_count(items),
            line_count: items.len(),
            cart_cleared,
            remaining_cart,
        })
    }

    async fn clear_cart(&self, user: UserId) -> bool {
        for attempt in 1..=CART_CLEAR_ATTEMPTS {
            match self.store.delete_all_cart_items(user).await {
                Ok(()) => return true,
                Err(e) => warn!(attempt, error = %e, "Failed to clear cart after order"),
            }
        }
        false
    }
}
