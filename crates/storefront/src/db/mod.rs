//! Storage interface for the managed grocery backend.
//!
//! # Tables
//!
//! - `categories` - Read-only category reference data
//! - `products` - Catalog with price, unit and stock
//! - `cart_items` - One row per (user, product), positive quantity
//! - `orders` / `order_items` - Placed orders with frozen unit prices
//! - `profiles` - Shopper name, phone and delivery address
//!
//! Row-level security and authentication are enforced by the backend, not
//! here. Every method takes the acting user explicitly.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p freshcart-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use freshcart_core::{
    CartLine, Category, NewOrder, NewOrderItem, Order, OrderId, Product, ProductId, UserId,
    UserProfile,
};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use memory::{FailPoint, MemoryStore};
pub use postgres::PgStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate cart row).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backend could not be reached or refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Collaborator interface implemented by the storage backend.
///
/// Implementations must be cheap to share across tasks; the storefront holds
/// one behind an `Arc<dyn GroceryStore>`.
#[async_trait]
pub trait GroceryStore: Send + Sync {
    /// Full catalog with categories joined.
    async fn fetch_catalog(&self) -> Result<Vec<Product>, RepositoryError>;

    /// One product, read now rather than from the snapshot.
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// All categories, ordered by name.
    async fn fetch_categories(&self) -> Result<Vec<Category>, RepositoryError>;

    /// The user's cart rows joined with their products.
    async fn fetch_cart_items(&self, user: UserId) -> Result<Vec<CartLine>, RepositoryError>;

    /// Insert a new cart row. Fails with `Conflict` if the row exists.
    async fn insert_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError>;

    /// Set an existing cart row's quantity. Fails with `NotFound` if absent.
    async fn update_cart_item_quantity(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError>;

    /// Delete one cart row. Deleting a missing row is not an error.
    async fn delete_cart_item(&self, user: UserId, product: ProductId)
    -> Result<(), RepositoryError>;

    /// Insert an order row and return its ID.
    async fn insert_order(&self, user: UserId, order: &NewOrder)
    -> Result<OrderId, RepositoryError>;

    /// Insert all items of an order; all or nothing.
    async fn insert_order_items(
        &self,
        order: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError>;

    /// Delete an order row (and any items). Used as a rollback.
    async fn delete_order(&self, order: OrderId) -> Result<(), RepositoryError>;

    /// Empty the user's cart.
    async fn delete_all_cart_items(&self, user: UserId) -> Result<(), RepositoryError>;

    /// The user's orders, newest first, with items. `limit` of `None` means all.
    async fn fetch_orders(
        &self,
        user: UserId,
        limit: Option<u32>,
        order_id: Option<OrderId>,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// The user's account profile, if one exists.
    async fn get_user_profile(&self, user: UserId)
    -> Result<Option<UserProfile>, RepositoryError>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
