//! In-process [`GroceryStore`] used by tests and local development.
//!
//! Behaves like the `PostgreSQL` store for every operation the storefront
//! relies on, and lets callers force individual operations to fail so the
//! order workflow's rollback paths can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use freshcart_core::{
    CartLine, Category, NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, Product,
    ProductId, UserId, UserProfile,
};

use super::{GroceryStore, RepositoryError};

/// A store operation that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    FetchCatalog,
    FetchProduct,
    FetchCategories,
    FetchCartItems,
    InsertCartItem,
    UpdateCartItem,
    DeleteCartItem,
    InsertOrder,
    InsertOrderItems,
    DeleteOrder,
    DeleteAllCartItems,
    FetchOrders,
    GetUserProfile,
}

#[derive(Debug, Default)]
struct MemoryState {
    products: Vec<Product>,
    categories: Vec<Category>,
    /// Cart rows per user in insertion order.
    carts: HashMap<UserId, Vec<(ProductId, u32)>>,
    /// Orders in insertion order (oldest first).
    orders: Vec<Order>,
    profiles: HashMap<UserId, UserProfile>,
    failures: HashSet<FailPoint>,
}

/// Store holding everything in memory behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a catalog.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                products,
                ..MemoryState::default()
            }),
        }
    }

    /// Add or replace a product.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store's lock is poisoned.
    pub fn upsert_product(&self, product: Product) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        match state.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => state.products.push(product),
        }
        Ok(())
    }

    /// Set a product's stock level.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the product does not exist.
    pub fn set_stock(&self, product: ProductId, stock: u32) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let entry = state
            .products
            .iter_mut()
            .find(|p| p.id == product)
            .ok_or(RepositoryError::NotFound)?;
        entry.stock_quantity = stock;
        Ok(())
    }

    /// Add a category.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store's lock is poisoned.
    pub fn add_category(&self, category: Category) -> Result<(), RepositoryError> {
        self.lock()?.categories.push(category);
        Ok(())
    }

    /// Store a user's profile.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store's lock is poisoned.
    pub fn set_profile(&self, user: UserId, profile: UserProfile) -> Result<(), RepositoryError> {
        self.lock()?.profiles.insert(user, profile);
        Ok(())
    }

    /// Make `point` fail until [`MemoryStore::recover`] is called.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store's lock is poisoned.
    pub fn fail(&self, point: FailPoint) -> Result<(), RepositoryError> {
        self.lock()?.failures.insert(point);
        Ok(())
    }

    /// Stop failing `point`.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store's lock is poisoned.
    pub fn recover(&self, point: FailPoint) -> Result<(), RepositoryError> {
        self.lock()?.failures.remove(&point);
        Ok(())
    }

    /// Number of stored orders across all users.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if the store's lock is poisoned.
    pub fn order_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.orders.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("memory store lock poisoned".to_string()))
    }

    /// Lock the state, failing first if `point` is armed.
    fn enter(&self, point: FailPoint) -> Result<MutexGuard<'_, MemoryState>, RepositoryError> {
        let state = self.lock()?;
        if state.failures.contains(&point) {
            return Err(RepositoryError::Unavailable(format!(
                "injected failure at {point:?}"
            )));
        }
        Ok(state)
    }
}

impl MemoryState {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

#[async_trait]
impl GroceryStore for MemoryStore {
    async fn fetch_catalog(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.enter(FailPoint::FetchCatalog)?.products.clone())
    }

    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let state = self.enter(FailPoint::FetchProduct)?;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut categories = self.enter(FailPoint::FetchCategories)?.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn fetch_cart_items(&self, user: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let state = self.enter(FailPoint::FetchCartItems)?;
        let Some(rows) = state.carts.get(&user) else {
            return Ok(Vec::new());
        };
        Ok(rows
            .iter()
            .filter_map(|(product_id, quantity)| {
                state.product(*product_id).map(|product| CartLine {
                    product: product.clone(),
                    quantity: *quantity,
                })
            })
            .collect())
    }

    async fn insert_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        let mut state = self.enter(FailPoint::InsertCartItem)?;
        if quantity == 0 {
            return Err(RepositoryError::Conflict(
                "cart quantity must be positive".to_string(),
            ));
        }
        if state.product(product).is_none() {
            return Err(RepositoryError::Conflict(format!(
                "product {product} does not exist"
            )));
        }
        let rows = state.carts.entry(user).or_default();
        if rows.iter().any(|(id, _)| *id == product) {
            return Err(RepositoryError::Conflict(format!(
                "product {product} is already in the cart"
            )));
        }
        rows.push((product, quantity));
        Ok(())
    }

    async fn update_cart_item_quantity(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        let mut state = self.enter(FailPoint::UpdateCartItem)?;
        if quantity == 0 {
            return Err(RepositoryError::Conflict(
                "cart quantity must be positive".to_string(),
            ));
        }
        let row = state
            .carts
            .get_mut(&user)
            .and_then(|rows| rows.iter_mut().find(|(id, _)| *id == product))
            .ok_or(RepositoryError::NotFound)?;
        row.1 = quantity;
        Ok(())
    }

    async fn delete_cart_item(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        let mut state = self.enter(FailPoint::DeleteCartItem)?;
        if let Some(rows) = state.carts.get_mut(&user) {
            rows.retain(|(id, _)| *id != product);
        }
        Ok(())
    }

    async fn insert_order(
        &self,
        user: UserId,
        order: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        let mut state = self.enter(FailPoint::InsertOrder)?;
        let id = OrderId::random();
        state.orders.push(Order {
            id,
            user_id: user,
            total_amount: order.total_amount,
            delivery_address: order.delivery.delivery_address.clone(),
            customer_name: order.delivery.customer_name.clone(),
            customer_phone: order.delivery.customer_phone.clone(),
            status: order.status,
            created_at: Utc::now(),
            items: Vec::new(),
        });
        Ok(id)
    }

    async fn insert_order_items(
        &self,
        order: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError> {
        let mut state = self.enter(FailPoint::InsertOrderItems)?;
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let product = state.product(item.product_id).ok_or_else(|| {
                RepositoryError::Conflict(format!("product {} does not exist", item.product_id))
            })?;
            if item.quantity == 0 {
                return Err(RepositoryError::Conflict(
                    "order quantity must be positive".to_string(),
                ));
            }
            rows.push(OrderItem {
                id: OrderItemId::random(),
                product_id: item.product_id,
                product_name: Some(product.name.clone()),
                quantity: item.quantity,
                price: item.price,
            });
        }
        let target = state
            .orders
            .iter_mut()
            .find(|o| o.id == order)
            .ok_or_else(|| RepositoryError::Conflict(format!("order {order} does not exist")))?;
        target.items.extend(rows);
        Ok(())
    }

    async fn delete_order(&self, order: OrderId) -> Result<(), RepositoryError> {
        let mut state = self.enter(FailPoint::DeleteOrder)?;
        state.orders.retain(|o| o.id != order);
        Ok(())
    }

    async fn delete_all_cart_items(&self, user: UserId) -> Result<(), RepositoryError> {
        let mut state = self.enter(FailPoint::DeleteAllCartItems)?;
        state.carts.remove(&user);
        Ok(())
    }

    async fn fetch_orders(
        &self,
        user: UserId,
        limit: Option<u32>,
        order_id: Option<OrderId>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let state = self.enter(FailPoint::FetchOrders)?;
        let limit = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        Ok(state
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user && order_id.is_none_or(|id| o.id == id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_user_profile(
        &self,
        user: UserId,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let state = self.enter(FailPoint::GetUserProfile)?;
        Ok(state.profiles.get(&user).cloned())
    }
}
