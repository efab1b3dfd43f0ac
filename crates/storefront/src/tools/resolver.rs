//! Tool execution.
//!
//! Every tool call follows the same sequence: fetch state, validate, mutate,
//! re-fetch state, respond. Each step is awaited before the next is issued,
//! and every decision (stock, cart membership, totals) is made against state
//! read during this call. No failure escapes as anything other than a
//! `success: false` envelope.

use freshcart_core::matching::FuzzySearch;
use freshcart_core::matching::MatchQuery;
use freshcart_core::matching::normalize::normalize;
use freshcart_core::{
    CartLine, Confidence, CurrencyCode, MatchType, OrderId, Product, ProfileGap, UserId,
    find_product,
};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use super::error::ToolError;
use super::request::{ToolCall, ToolRequest};
use super::response::{
    CartChangeView, CartView, HistoryView, MatchedProduct, OrderPlacedView, OrderView,
    ProductListView, ProductView, ToolPayload, ToolResponse, UserStatusView, format_amount, money,
};
use crate::catalog::CatalogSnapshot;
use crate::db::GroceryStore;
use crate::services::{CartState, CartStateAccessor, OrderPlacement};

type ToolResult = Result<ToolResponse, ToolError>;

/// A catalog product a free-text reference resolved to.
#[derive(Debug, Clone)]
struct Resolved {
    product: Product,
    confidence: Confidence,
    match_type: MatchType,
}

impl Resolved {
    fn view(&self) -> MatchedProduct {
        MatchedProduct {
            product_id: self.product.id,
            name: self.product.name.clone(),
            confidence: self.confidence,
            match_type: self.match_type,
        }
    }

    /// A "did you mean" note for matches the shopper should double-check.
    fn confirmation_note(&self, query: &str) -> String {
        if self.confidence.needs_confirmation() {
            format!(
                " I took \"{query}\" to mean {}; let me know if you meant something else.",
                self.product.name
            )
        } else {
            String::new()
        }
    }
}

/// Executes tool calls for one signed-in (or anonymous) shopper.
pub struct ToolResolver<'a> {
    store: &'a dyn GroceryStore,
    catalog: &'a CatalogSnapshot,
    currency: CurrencyCode,
}

impl<'a> ToolResolver<'a> {
    #[must_use]
    pub const fn new(
        store: &'a dyn GroceryStore,
        catalog: &'a CatalogSnapshot,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            store,
            catalog,
            currency,
        }
    }

    /// Validate and execute a raw tool call.
    #[instrument(skip(self, call), fields(tool = %call.name, user_id = ?user))]
    pub async fn execute(&self, user: Option<UserId>, call: &ToolCall) -> ToolResponse {
        match ToolRequest::try_from(call) {
            Ok(request) => self.handle(user, request).await,
            Err(e) => {
                debug!(error = %e, "Rejected tool arguments");
                e.into()
            }
        }
    }

    /// Execute an already validated request.
    pub async fn handle(&self, user: Option<UserId>, request: ToolRequest) -> ToolResponse {
        let tool = request.name();
        let result = match request {
            ToolRequest::GetCartDetails => self.get_cart_details(user).await,
            ToolRequest::AddItemToCart {
                product_name,
                quantity,
            } => self.add_item_to_cart(user, &product_name, quantity).await,
            ToolRequest::RemoveItemFromCart { product_name } => {
                self.remove_item_from_cart(user, &product_name).await
            }
            ToolRequest::UpdateCartItemQuantity {
                product_name,
                quantity,
            } => {
                self.update_cart_item_quantity(user, &product_name, quantity)
                    .await
            }
            ToolRequest::GetAvailableProducts {
                category,
                search_term,
                limit,
            } => {
                self.get_available_products(category.as_deref(), search_term.as_deref(), limit)
                    .await
            }
            ToolRequest::GetPurchaseHistory { limit, order_id } => {
                self.get_purchase_history(user, limit, order_id).await
            }
            ToolRequest::PlaceOrder => self.place_order(user).await,
            ToolRequest::GetUserStatus => self.get_user_status(user).await,
        };

        match result {
            Ok(response) => {
                info!(%tool, "Tool call succeeded");
                response
            }
            Err(e) => {
                if !e.is_dependency_failure() {
                    info!(%tool, error = %e, "Tool call declined");
                }
                e.into()
            }
        }
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    async fn get_cart_details(&self, user: Option<UserId>) -> ToolResult {
        let cart = self.cart().fetch_latest(user).await?;
        let message = if cart.is_empty() {
            "Your cart is empty.".to_string()
        } else {
            let lines: Vec<String> = cart
                .items
                .iter()
                .map(|line| format!("{} × {}", line.quantity, line.product.name))
                .collect();
            format!(
                "You have {} in your cart ({}), totalling {}.",
                count_items(cart.item_count),
                lines.join(", "),
                format_amount(cart.total_amount, self.currency)
            )
        };
        Ok(ToolResponse::ok(
            message,
            ToolPayload::Cart(CartView::new(&cart, self.currency)),
        ))
    }

    async fn add_item_to_cart(
        &self,
        user: Option<UserId>,
        product_name: &str,
        quantity: u32,
    ) -> ToolResult {
        let user = user.ok_or(ToolError::Unauthenticated)?;
        let resolved = self.resolve(product_name).await?;
        let product_id = resolved.product.id;

        let cart = self.cart().fetch_latest(Some(user)).await?;
        let line = cart.line(product_id);
        let in_cart = line.map_or(0, |l| l.quantity);
        let available = match line {
            Some(line) => line.product.stock_quantity,
            None => self.current_stock(&resolved.product).await?,
        };
        let requested = in_cart.saturating_add(quantity);
        if requested > available {
            return Err(ToolError::InsufficientStock {
                product: resolved.product.name,
                available,
                requested,
                in_cart,
            });
        }

        if in_cart > 0 {
            self.store
                .update_cart_item_quantity(user, product_id, requested)
                .await?;
        } else {
            self.store
                .insert_cart_item(user, product_id, quantity)
                .await?;
        }

        let cart = self.cart().fetch_latest(Some(user)).await?;
        let message = format!(
            "Added {quantity} × {} to your cart. {}{}",
            resolved.product.name,
            self.summary(&cart),
            resolved.confirmation_note(product_name)
        );
        Ok(self.cart_change(message, &resolved, &cart))
    }

    async fn remove_item_from_cart(&self, user: Option<UserId>, product_name: &str) -> ToolResult {
        let user = user.ok_or(ToolError::Unauthenticated)?;
        let resolution = self.resolve(product_name).await;
        let cart = self.cart().fetch_latest(Some(user)).await?;
        let (line, resolved) = locate_in_cart(&cart, resolution, product_name)?;

        self.store.delete_cart_item(user, line.product.id).await?;

        let cart = self.cart().fetch_latest(Some(user)).await?;
        let message = format!(
            "Removed {} from your cart. {}{}",
            resolved.product.name,
            self.summary(&cart),
            resolved.confirmation_note(product_name)
        );
        Ok(self.cart_change(message, &resolved, &cart))
    }

    async fn update_cart_item_quantity(
        &self,
        user: Option<UserId>,
        product_name: &str,
        quantity: u32,
    ) -> ToolResult {
        let user = user.ok_or(ToolError::Unauthenticated)?;
        let resolution = self.resolve(product_name).await;
        let cart = self.cart().fetch_latest(Some(user)).await?;
        let (line, resolved) = locate_in_cart(&cart, resolution, product_name)?;

        let available = line.product.stock_quantity;
        if quantity > available {
            return Err(ToolError::InsufficientStock {
                product: line.product.name.clone(),
                available,
                requested: quantity,
                in_cart: 0,
            });
        }

        let action = if quantity == 0 {
            self.store.delete_cart_item(user, line.product.id).await?;
            format!("Removed {} from your cart.", line.product.name)
        } else {
            self.store
                .update_cart_item_quantity(user, line.product.id, quantity)
                .await?;
            format!("Set {} to {quantity}.", line.product.name)
        };

        let cart = self.cart().fetch_latest(Some(user)).await?;
        let message = format!(
            "{action} {}{}",
            self.summary(&cart),
            resolved.confirmation_note(product_name)
        );
        Ok(self.cart_change(message, &resolved, &cart))
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    async fn get_available_products(
        &self,
        category: Option<&str>,
        search_term: Option<&str>,
        limit: usize,
    ) -> ToolResult {
        self.catalog.ensure_loaded(self.store).await?;
        let catalog = self.catalog.products();

        let category = category.map(normalize);
        let in_scope: Vec<Product> = catalog
            .iter()
            .filter(|p| p.in_stock())
            .filter(|p| {
                category.as_deref().is_none_or(|wanted| {
                    p.category_name()
                        .is_some_and(|name| normalize(name).contains(wanted))
                })
            })
            .cloned()
            .collect();

        let products: Vec<ProductView> = match search_term {
            Some(term) => {
                let query = MatchQuery::new(term);
                FuzzySearch::default()
                    .search(query.search_text(), &in_scope)
                    .into_iter()
                    .take(limit)
                    .map(|hit| ProductView::from(hit.product))
                    .collect()
            }
            None => in_scope.iter().take(limit).map(ProductView::from).collect(),
        };

        let message = if products.is_empty() {
            "I couldn't find any in-stock products matching that. Try another category or search."
                .to_string()
        } else {
            let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
            format!(
                "Here {} available: {}.",
                if products.len() == 1 {
                    "is 1 product".to_string()
                } else {
                    format!("are {} products", products.len())
                },
                names.join(", ")
            )
        };

        Ok(ToolResponse::ok(
            message,
            ToolPayload::Products(ProductListView {
                count: products.len(),
                products,
                currency: self.currency,
            }),
        ))
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    async fn get_purchase_history(
        &self,
        user: Option<UserId>,
        limit: u32,
        order_id: Option<OrderId>,
    ) -> ToolResult {
        let user = user.ok_or(ToolError::Unauthenticated)?;
        let orders = self.store.fetch_orders(user, Some(limit), order_id).await?;
        let Some(latest) = orders.first() else {
            return Err(ToolError::NoOrders { order_id });
        };

        let latest_summary = format!(
            "placed {}, came to {} and is {}",
            latest.created_at.format("%d %b %Y"),
            format_amount(latest.total_amount, self.currency),
            latest.status.to_string().to_lowercase()
        );
        let message = if order_id.is_some() {
            format!(
                "That order has {}: it was {latest_summary}.",
                count_items(latest.unit_count())
            )
        } else if orders.len() == 1 {
            format!("You have 1 recent order. It was {latest_summary}.")
        } else {
            format!(
                "Here are your {} most recent orders. The latest was {latest_summary}.",
                orders.len()
            )
        };

        Ok(ToolResponse::ok(
            message,
            ToolPayload::History(HistoryView {
                count: orders.len(),
                orders: orders.iter().map(OrderView::from).collect(),
                currency: self.currency,
            }),
        ))
    }

    async fn place_order(&self, user: Option<UserId>) -> ToolResult {
        let user = user.ok_or(ToolError::Unauthenticated)?;
        let cart = self.cart().fetch_latest(Some(user)).await?;
        if cart.is_empty() {
            return Err(ToolError::EmptyCart);
        }

        let profile = self
            .store
            .get_user_profile(user)
            .await?
            .unwrap_or_default();
        let delivery = profile
            .delivery_profile()
            .map_err(ToolError::IncompleteProfile)?;

        let placed = OrderPlacement::new(self.store)
            .place(user, &delivery, &cart.items)
            .await?;

        let warning = placed.warning();
        let follow_up = warning.unwrap_or("Your cart is now empty.");
        let message = format!(
            "Your order is placed! {} totalling {} will be delivered to {}. {follow_up}",
            count_items(placed.item_count),
            format_amount(placed.total_amount, self.currency),
            delivery.delivery_address
        );

        Ok(ToolResponse::ok(
            message,
            ToolPayload::OrderPlaced(OrderPlacedView {
                order_id: placed.order_id,
                total_amount: money(placed.total_amount),
                item_count: placed.item_count,
                currency: self.currency,
                cart_cleared: placed.cart_cleared,
                cart: placed
                    .remaining_cart
                    .as_ref()
                    .map(|c| CartView::new(c, self.currency)),
                warning: warning.map(str::to_string),
            }),
        ))
    }

    // -------------------------------------------------------------------------
    // Account
    // -------------------------------------------------------------------------

    async fn get_user_status(&self, user: Option<UserId>) -> ToolResult {
        let Some(user) = user else {
            return Ok(ToolResponse::ok(
                "You're not signed in. Please sign in to use your cart and place orders.",
                ToolPayload::UserStatus(UserStatusView {
                    signed_in: false,
                    cart_item_count: 0,
                    cart_total: money(Decimal::ZERO),
                    currency: self.currency,
                    profile_complete: false,
                    missing_details: vec![ProfileGap::Phone, ProfileGap::Address],
                }),
            ));
        };

        let cart = self.cart().fetch_latest(Some(user)).await?;
        let profile = self
            .store
            .get_user_profile(user)
            .await?
            .unwrap_or_default();
        let profile_complete = profile.has_delivery_details();
        let missing_details: Vec<ProfileGap> = profile
            .gaps()
            .into_iter()
            .filter(|gap| *gap != ProfileGap::Name)
            .collect();

        let profile_note = if profile_complete {
            "Your delivery details are complete.".to_string()
        } else {
            let steps: Vec<&str> = missing_details.iter().map(|g| g.guidance()).collect();
            format!("Before ordering, please {}.", steps.join(" and "))
        };
        let message = format!(
            "You're signed in. Your cart has {} totalling {}. {profile_note}",
            count_items(cart.item_count),
            format_amount(cart.total_amount, self.currency)
        );

        Ok(ToolResponse::ok(
            message,
            ToolPayload::UserStatus(UserStatusView {
                signed_in: true,
                cart_item_count: cart.item_count,
                cart_total: money(cart.total_amount),
                currency: self.currency,
                profile_complete,
                missing_details,
            }),
        ))
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    const fn cart(&self) -> CartStateAccessor<'a> {
        CartStateAccessor::new(self.store)
    }

    /// Resolve a product reference against the catalog snapshot.
    async fn resolve(&self, query: &str) -> Result<Resolved, ToolError> {
        self.catalog.ensure_loaded(self.store).await?;
        let catalog = self.catalog.products();
        let result = find_product(query, &catalog);
        match result.product {
            Some(product) => Ok(Resolved {
                product: product.clone(),
                confidence: result.confidence,
                match_type: result.match_type,
            }),
            None => Err(ToolError::ProductNotFound {
                query: query.to_string(),
                suggestions: result
                    .alternatives
                    .iter()
                    .map(|p| p.name.clone())
                    .collect(),
            }),
        }
    }

    /// Stock for a product not yet in the cart, read from storage since the
    /// snapshot may be stale.
    async fn current_stock(&self, product: &Product) -> Result<u32, ToolError> {
        match self.store.fetch_product(product.id).await? {
            Some(current) => Ok(current.stock_quantity),
            None => Err(ToolError::ProductNotFound {
                query: product.name.clone(),
                suggestions: Vec::new(),
            }),
        }
    }

    fn summary(&self, cart: &CartState) -> String {
        if cart.is_empty() {
            "Your cart is now empty.".to_string()
        } else {
            format!(
                "Your cart now has {} totalling {}.",
                count_items(cart.item_count),
                format_amount(cart.total_amount, self.currency)
            )
        }
    }

    fn cart_change(&self, message: String, resolved: &Resolved, cart: &CartState) -> ToolResponse {
        ToolResponse::ok(
            message,
            ToolPayload::CartChange(CartChangeView {
                product: resolved.view(),
                quantity_in_cart: cart.quantity_of(resolved.product.id),
                cart: CartView::new(cart, self.currency),
            }),
        )
    }
}

/// Find the cart line a product reference points at.
///
/// A catalog match must be in the cart. Only when nothing in the catalog
/// matched is the reference tried against the cart's own products, and then
/// only confident matches count.
fn locate_in_cart<'c>(
    cart: &'c CartState,
    catalog_match: Result<Resolved, ToolError>,
    query: &str,
) -> Result<(&'c CartLine, Resolved), ToolError> {
    let not_found = match catalog_match {
        Ok(resolved) => {
            return match cart.line(resolved.product.id) {
                Some(line) => Ok((line, resolved)),
                None => Err(ToolError::NotInCart {
                    product: resolved.product.name,
                    cart_items: cart
                        .product_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                }),
            };
        }
        Err(e @ ToolError::ProductNotFound { .. }) => e,
        Err(e) => return Err(e),
    };

    let in_cart: Vec<Product> = cart.items.iter().map(|l| l.product.clone()).collect();
    let cart_match = find_product(query, &in_cart);
    let confident = matches!(
        cart_match.confidence,
        Confidence::Exact | Confidence::High | Confidence::Medium
    );
    cart_match
        .product
        .filter(|_| confident)
        .and_then(|product| cart.line(product.id))
        .map(|line| {
            (
                line,
                Resolved {
                    product: line.product.clone(),
                    confidence: cart_match.confidence,
                    match_type: cart_match.match_type,
                },
            )
        })
        .ok_or(not_found)
}

/// "1 item", "3 items".
fn count_items(count: u32) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshcart_core::UserProfile;
    use serde_json::json;

    use super::*;
    use crate::db::{FailPoint, MemoryStore};
    use crate::tools::error::ErrorCode;

    struct Shop {
        store: MemoryStore,
        catalog: CatalogSnapshot,
        user: UserId,
    }

    impl Shop {
        fn new() -> Self {
            let store = MemoryStore::with_products(vec![
                Product::new("Apples", Decimal::new(120, 0), "kg", 30),
                Product::new("Bananas", Decimal::new(40, 0), "dozen", 25),
                Product::new("Tomatoes", Decimal::new(30, 0), "kg", 5),
                Product::new("Milk", Decimal::new(60, 0), "litre", 20),
                Product::new("Saffron", Decimal::new(500, 0), "gram", 0),
            ]);
            Self {
                store,
                catalog: CatalogSnapshot::new(),
                user: UserId::random(),
            }
        }

        async fn call(&self, name: &str, args: serde_json::Value) -> ToolResponse {
            ToolResolver::new(&self.store, &self.catalog, CurrencyCode::INR)
                .execute(Some(self.user), &ToolCall::new(name, args))
                .await
        }
    }

    #[tokio::test]
    async fn test_add_then_get_cart() {
        let shop = Shop::new();
        let added = shop
            .call("addItemToCart", json!({"productName": "Bananas", "quantity": 2}))
            .await;
        assert!(added.success, "{}", added.message);

        let cart = shop.call("getCartDetails", json!({})).await;
        let view = cart.cart().unwrap();
        assert_eq!(view.item_count, 2);
        assert_eq!(view.total_amount, Decimal::new(8000, 2));
        assert_eq!(view.currency, CurrencyCode::INR);
    }

    #[tokio::test]
    async fn test_repeated_adds_cannot_exceed_stock() {
        let shop = Shop::new();
        let first = shop
            .call("addItemToCart", json!({"productName": "Tomatoes", "quantity": 4}))
            .await;
        assert!(first.success);

        let second = shop
            .call("addItemToCart", json!({"productName": "Tomatoes", "quantity": 2}))
            .await;
        assert!(!second.success);
        assert_eq!(second.error, Some(ErrorCode::InsufficientStock));
        assert!(second.message.contains("only 5 available"));
        assert!(second.message.contains("already have 4"));
    }

    #[tokio::test]
    async fn test_unauthenticated_cart_actions_fail() {
        let shop = Shop::new();
        let resolver = ToolResolver::new(&shop.store, &shop.catalog, CurrencyCode::INR);
        for name in ["getCartDetails", "addItemToCart", "placeOrder", "getPurchaseHistory"] {
            let response = resolver
                .execute(None, &ToolCall::new(name, json!({"productName": "Milk"})))
                .await;
            assert!(!response.success);
            assert_eq!(response.error, Some(ErrorCode::Authentication), "{name}");
        }
    }

    #[tokio::test]
    async fn test_unknown_product_offers_suggestions() {
        let shop = Shop::new();
        let response = shop
            .call("addItemToCart", json!({"productName": "dragonfruit"}))
            .await;
        assert!(!response.success);
        assert_eq!(response.error, Some(ErrorCode::ProductNotFound));
    }

    #[tokio::test]
    async fn test_remove_item_not_in_cart_lists_contents() {
        let shop = Shop::new();
        shop.call("addItemToCart", json!({"productName": "Milk"}))
            .await;
        let response = shop
            .call("removeItemFromCart", json!({"productName": "Apples"}))
            .await;
        assert_eq!(response.error, Some(ErrorCode::NotInCart));
        assert!(response.message.contains("Milk"));
    }

    #[tokio::test]
    async fn test_remove_resolved_product_never_falls_back_to_neighbour() {
        let store = MemoryStore::with_products(vec![
            Product::new("Apples", Decimal::new(120, 0), "kg", 30),
            Product::new("Apple Juice", Decimal::new(90, 0), "litre", 10),
        ]);
        let shop = Shop {
            store,
            catalog: CatalogSnapshot::new(),
            user: UserId::random(),
        };
        let added = shop
            .call("addItemToCart", json!({"productName": "Apple Juice"}))
            .await;
        assert!(added.success, "{}", added.message);

        for tool in ["removeItemFromCart", "updateCartItemQuantity"] {
            let response = shop
                .call(tool, json!({"productName": "Apples", "quantity": 0}))
                .await;
            assert!(!response.success, "{tool}: {}", response.message);
            assert_eq!(response.error, Some(ErrorCode::NotInCart), "{tool}");
            assert!(response.message.contains("Apple Juice"));
        }

        let cart = shop.call("getCartDetails", json!({})).await;
        assert_eq!(cart.cart().unwrap().item_count, 1);
    }

    #[tokio::test]
    async fn test_remove_unknown_to_catalog_matches_cart() {
        let shop = Shop::new();
        shop.call("addItemToCart", json!({"productName": "Milk"}))
            .await;
        // Delisted after it was added: the snapshot no longer knows it
        shop.catalog
            .replace(vec![Product::new("Bananas", Decimal::new(40, 0), "dozen", 25)]);
        let response = shop
            .call("removeItemFromCart", json!({"productName": "milk"}))
            .await;
        assert!(response.success, "{}", response.message);
        assert!(response.cart().unwrap().is_empty);
    }

    #[tokio::test]
    async fn test_add_checks_stock_read_during_the_call() {
        let shop = Shop::new();
        shop.catalog.ensure_loaded(&shop.store).await.unwrap();
        let bananas = shop
            .catalog
            .products()
            .iter()
            .find(|p| p.name == "Bananas")
            .cloned()
            .unwrap();
        shop.store.set_stock(bananas.id, 1).unwrap();

        let response = shop
            .call("addItemToCart", json!({"productName": "Bananas", "quantity": 2}))
            .await;
        assert_eq!(response.error, Some(ErrorCode::InsufficientStock));
        assert!(response.message.contains("only 1 available"));
    }

    #[tokio::test]
    async fn test_update_to_zero_removes() {
        let shop = Shop::new();
        shop.call("addItemToCart", json!({"productName": "Milk", "quantity": 2}))
            .await;
        let response = shop
            .call(
                "updateCartItemQuantity",
                json!({"productName": "milk", "quantity": 0}),
            )
            .await;
        assert!(response.success);
        assert!(response.cart().unwrap().is_empty);
    }

    #[tokio::test]
    async fn test_update_negative_points_to_remove() {
        let shop = Shop::new();
        let response = shop
            .call(
                "updateCartItemQuantity",
                json!({"productName": "Milk", "quantity": -2}),
            )
            .await;
        assert_eq!(response.error, Some(ErrorCode::Validation));
        assert!(response.message.contains("remove"));
    }

    #[tokio::test]
    async fn test_product_listing_excludes_out_of_stock() {
        let shop = Shop::new();
        let response = shop.call("getAvailableProducts", json!({"limit": 50})).await;
        let Some(ToolPayload::Products(list)) = response.payload else {
            panic!("expected product list");
        };
        assert_eq!(list.count, 4);
        assert!(list.products.iter().all(|p| p.name != "Saffron"));
    }

    #[tokio::test]
    async fn test_product_search_term() {
        let shop = Shop::new();
        let response = shop
            .call("getAvailableProducts", json!({"searchTerm": "tomato"}))
            .await;
        let Some(ToolPayload::Products(list)) = response.payload else {
            panic!("expected product list");
        };
        assert_eq!(list.products[0].name, "Tomatoes");
    }

    #[tokio::test]
    async fn test_place_order_requires_profile() {
        let shop = Shop::new();
        shop.call("addItemToCart", json!({"productName": "Milk"}))
            .await;
        let response = shop.call("placeOrder", json!({})).await;
        assert_eq!(response.error, Some(ErrorCode::IncompleteProfile));

        shop.store
            .set_profile(
                shop.user,
                UserProfile {
                    full_name: Some("Asha Rao".to_string()),
                    phone: Some("9876543210".to_string()),
                    address: Some("12 Lake Road, Pune".to_string()),
                },
            )
            .unwrap();
        let response = shop.call("placeOrder", json!({})).await;
        assert!(response.success, "{}", response.message);
        assert!(response.cart().unwrap().is_empty);
    }

    #[tokio::test]
    async fn test_storage_failure_becomes_unavailable_envelope() {
        let shop = Shop::new();
        shop.store.fail(FailPoint::FetchCartItems).unwrap();
        let response = shop.call("getCartDetails", json!({})).await;
        assert!(!response.success);
        assert_eq!(response.error, Some(ErrorCode::Unavailable));
    }

    #[tokio::test]
    async fn test_user_status_signed_out() {
        let shop = Shop::new();
        let response = ToolResolver::new(&shop.store, &shop.catalog, CurrencyCode::INR)
            .execute(None, &ToolCall::new("getUserStatus", json!(null)))
            .await;
        assert!(response.success);
        let Some(ToolPayload::UserStatus(status)) = response.payload else {
            panic!("expected user status");
        };
        assert!(!status.signed_in);
    }

    #[test]
    fn test_count_items() {
        assert_eq!(count_items(1), "1 item");
        assert_eq!(count_items(3), "3 items");
    }
}
