//! Integration tests for FreshCart.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (in-memory store, no services needed)
//! cargo test -p freshcart-integration-tests
//!
//! # Live tests against a running storefront
//! STOREFRONT_BASE_URL=http://localhost:3000 cargo test -p freshcart-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `matching` - Product resolution properties
//! - `cart_tools` - Cart tool round trips over the tool boundary
//! - `orders` - Order placement, atomicity and history
//! - `storefront_http` - Live HTTP tests (ignored by default)
//!
//! [`TestShop`] wires the real tool resolver to a [`MemoryStore`] seeded with
//! a small grocery catalog.

use std::sync::Arc;

use freshcart_core::{CurrencyCode, Product, UserId, UserProfile};
use freshcart_storefront::db::{GroceryStore, MemoryStore, RepositoryError};
use freshcart_storefront::state::AppState;
use freshcart_storefront::tools::{ToolCall, ToolResponse};
use rust_decimal::Decimal;
use serde_json::Value;

/// The demo catalog: name, price, unit, stock.
pub const CATALOG: [(&str, i64, &str, u32); 8] = [
    ("Apples", 120, "kg", 30),
    ("Bananas", 40, "dozen", 25),
    ("Tomatoes", 30, "kg", 5),
    ("Onions", 35, "kg", 50),
    ("Milk", 60, "litre", 20),
    ("Paneer", 90, "200 g", 12),
    ("Brown Bread", 45, "loaf", 8),
    ("Saffron", 500, "g", 0),
];

/// Products for [`CATALOG`].
#[must_use]
pub fn demo_products() -> Vec<Product> {
    CATALOG
        .iter()
        .map(|(name, price, unit, stock)| Product::new(*name, Decimal::new(*price, 0), *unit, *stock))
        .collect()
}

/// A profile that satisfies every delivery check.
#[must_use]
pub fn complete_profile() -> UserProfile {
    UserProfile {
        full_name: Some("Asha Rao".to_string()),
        phone: Some("+91 98450 12345".to_string()),
        address: Some("12 MG Road, Bengaluru 560001".to_string()),
    }
}

/// A store, app state and signed-in shopper.
pub struct TestShop {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub user: UserId,
}

impl TestShop {
    /// A shop over the demo catalog with a shopper who has no profile.
    ///
    /// The state shares the store, so fail points and stock changes set on
    /// [`Self::store`] are seen by tool calls.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::with_products(demo_products()));
        let shared: Arc<dyn GroceryStore> = Arc::<MemoryStore>::clone(&store);
        let state = AppState::new(shared, CurrencyCode::INR);
        Self {
            store,
            state,
            user: UserId::random(),
        }
    }

    /// A shop whose shopper can place orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile could not be stored.
    pub fn with_complete_profile() -> Result<Self, RepositoryError> {
        let shop = Self::new();
        shop.store.set_profile(shop.user, complete_profile())?;
        Ok(shop)
    }

    /// Call a tool as the signed-in shopper.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolResponse {
        self.call_as(Some(self.user), name, arguments).await
    }

    /// Call a tool as any shopper (or signed out).
    pub async fn call_as(&self, user: Option<UserId>, name: &str, arguments: Value) -> ToolResponse {
        self.state
            .resolver()
            .execute(user, &ToolCall::new(name, arguments))
            .await
    }

    /// Look up a catalog product by exact name, loading the snapshot first.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog could not be loaded.
    pub async fn product(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        self.state
            .catalog()
            .ensure_loaded(self.state.store())
            .await?;
        Ok(self
            .state
            .catalog()
            .products()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }
}

impl Default for TestShop {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a response to its wire JSON.
#[must_use]
pub fn wire(response: &ToolResponse) -> Value {
    serde_json::to_value(response).unwrap_or(Value::Null)
}
