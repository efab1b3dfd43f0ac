//! `PostgreSQL` implementation of [`GroceryStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use freshcart_core::{
    CartLine, Category, CategoryId, CategoryRef, NewOrder, NewOrderItem, Order, OrderId,
    OrderItem, OrderItemId, OrderStatus, Product, ProductId, UserId, UserProfile,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::{GroceryStore, RepositoryError};

const PRODUCT_COLUMNS: &str = r"
    p.id, p.name, p.description, p.price, p.image_url,
    p.category_id, c.name AS category_name,
    p.stock_quantity, p.unit, p.created_at
";

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    category_id: Option<CategoryId>,
    category_name: Option<String>,
    stock_quantity: i32,
    unit: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock_quantity = u32::try_from(row.stock_quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {} has negative stock {}",
                row.id, row.stock_quantity
            ))
        })?;
        let category = match (row.category_id, row.category_name) {
            (Some(id), Some(name)) => Some(CategoryRef { id, name }),
            _ => None,
        };
        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            category,
            stock_quantity,
            unit: row.unit,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    #[sqlx(flatten)]
    product: ProductRow,
    quantity: i32,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total_amount: Decimal,
    delivery_address: String,
    customer_name: String,
    customer_phone: String,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: Option<String>,
    quantity: i32,
    price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

// =============================================================================
// Store
// =============================================================================

/// Store backed by the managed `PostgreSQL` database.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl GroceryStore for PgStore {
    #[instrument(skip(self))]
    async fn fetch_catalog(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             ORDER BY p.name, p.created_at"
        );
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn fetch_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products p
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE p.id = $1"
        );
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, image_url FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.id,
                name: row.name,
                description: row.description,
                image_url: row.image_url,
            })
            .collect())
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn fetch_cart_items(&self, user: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}, ci.quantity
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             LEFT JOIN categories c ON c.id = p.category_id
             WHERE ci.user_id = $1
             ORDER BY ci.created_at, p.name"
        );
        let rows = sqlx::query_as::<_, CartLineRow>(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let quantity = from_db_quantity(row.quantity, "cart item")?;
                Ok(CartLine {
                    product: Product::try_from(row.product)?,
                    quantity,
                })
            })
            .collect()
    }

    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    async fn insert_cart_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, $3)")
            .bind(user)
            .bind(product)
            .bind(to_db_quantity(quantity)?)
            .execute(&self.pool)
            .await
            .map_err(map_conflict)?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    async fn update_cart_item_quantity(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3, updated_at = NOW()
             WHERE user_id = $1 AND product_id = $2",
        )
        .bind(user)
        .bind(product)
        .bind(to_db_quantity(quantity)?)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    async fn delete_cart_item(
        &self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
            .bind(user)
            .bind(product)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, order), fields(user_id = %user, total = %order.total_amount))]
    async fn insert_order(
        &self,
        user: UserId,
        order: &NewOrder,
    ) -> Result<OrderId, RepositoryError> {
        let id: OrderId = sqlx::query_scalar(
            "INSERT INTO orders
                (user_id, total_amount, delivery_address, customer_name, customer_phone, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(user)
        .bind(order.total_amount)
        .bind(&order.delivery.delivery_address)
        .bind(&order.delivery.customer_name)
        .bind(&order.delivery.customer_phone)
        .bind(order.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[instrument(skip(self, items), fields(order_id = %order, items = items.len()))]
    async fn insert_order_items(
        &self,
        order: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError> {
        let product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id.as_uuid()).collect();
        let quantities = items
            .iter()
            .map(|i| to_db_quantity(i.quantity))
            .collect::<Result<Vec<i32>, _>>()?;
        let prices: Vec<Decimal> = items.iter().map(|i| i.price).collect();

        // A single statement is atomic: either every row lands or none do.
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price)
             SELECT $1, item.product_id, item.quantity, item.price
             FROM UNNEST($2::uuid[], $3::int4[], $4::numeric[])
                  AS item(product_id, quantity, price)",
        )
        .bind(order)
        .bind(product_ids)
        .bind(quantities)
        .bind(prices)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[instrument(skip(self), fields(order_id = %order))]
    async fn delete_order(&self, order: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn delete_all_cart_items(&self, user: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn fetch_orders(
        &self,
        user: UserId,
        limit: Option<u32>,
        order_id: Option<OrderId>,
    ) -> Result<Vec<Order>, RepositoryError> {
        // LIMIT NULL means no limit in PostgreSQL
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, total_amount, delivery_address, customer_name,
                    customer_phone, status, created_at
             FROM orders
             WHERE user_id = $1 AND ($2::uuid IS NULL OR id = $2)
             ORDER BY created_at DESC
             LIMIT $3",
        )
        .bind(user)
        .bind(order_id)
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = rows.iter().map(|r| r.id.as_uuid()).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name,
                    oi.quantity, oi.price
             FROM order_items oi
             LEFT JOIN products p ON p.id = oi.product_id
             WHERE oi.order_id = ANY($1)
             ORDER BY oi.created_at, oi.id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            let quantity = from_db_quantity(row.quantity, "order item")?;
            items_by_order.entry(row.order_id).or_default().push(OrderItem {
                id: row.id,
                product_id: row.product_id,
                product_name: row.product_name,
                quantity,
                price: row.price,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| Order {
                items: items_by_order.remove(&row.id).unwrap_or_default(),
                id: row.id,
                user_id: row.user_id,
                total_amount: row.total_amount,
                delivery_address: row.delivery_address,
                customer_name: row.customer_name,
                customer_phone: row.customer_phone,
                status: row.status,
                created_at: row.created_at,
            })
            .collect())
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn get_user_profile(
        &self,
        user: UserId,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT full_name, phone, address FROM profiles WHERE id = $1",
        )
        .bind(user)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| UserProfile {
            full_name: r.full_name,
            phone: r.phone,
            address: r.address,
        }))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn to_db_quantity(quantity: u32) -> Result<i32, RepositoryError> {
    i32::try_from(quantity)
        .map_err(|_| RepositoryError::Conflict(format!("quantity {quantity} is out of range")))
}

fn from_db_quantity(quantity: i32, what: &str) -> Result<u32, RepositoryError> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("{what} has non-positive quantity {quantity}"))
        })
}

fn map_conflict(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        other => RepositoryError::Database(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn row(stock: i32) -> ProductRow {
        ProductRow {
            id: ProductId::random(),
            name: "Apples".to_string(),
            description: None,
            price: Decimal::new(120, 0),
            image_url: None,
            category_id: Some(CategoryId::random()),
            category_name: Some("Fruits".to_string()),
            stock_quantity: stock,
            unit: "kg".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_row_conversion() {
        let product = Product::try_from(row(12)).unwrap();
        assert_eq!(product.stock_quantity, 12);
        assert_eq!(product.category_name(), Some("Fruits"));
    }

    #[test]
    fn test_negative_stock_is_corruption() {
        let err = Product::try_from(row(-1)).unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[test]
    fn test_category_requires_id_and_name() {
        let mut r = row(1);
        r.category_name = None;
        assert!(Product::try_from(r).unwrap().category.is_none());
    }

    #[test]
    fn test_quantity_conversions() {
        assert_eq!(to_db_quantity(3).unwrap(), 3);
        assert!(to_db_quantity(u32::MAX).is_err());
        assert_eq!(from_db_quantity(2, "cart item").unwrap(), 2);
        assert!(from_db_quantity(0, "cart item").is_err());
        assert!(from_db_quantity(-4, "cart item").is_err());
    }
}
