//! Cart tools exercised through the tool boundary.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use freshcart_core::{Product, UserId};
use freshcart_integration_tests::{TestShop, wire};
use freshcart_storefront::tools::ErrorCode;
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn test_add_then_get_round_trip() {
    let shop = TestShop::new();
    let bananas = shop.product("Bananas").await.unwrap().unwrap();

    let added = shop
        .call("addItemToCart", json!({ "productName": "Bananas", "quantity": 2 }))
        .await;
    assert!(added.success, "{}", added.message);

    let cart = shop.call("getCartDetails", json!({})).await;
    let view = cart.cart().unwrap();
    assert_eq!(view.item_count, 2);
    assert_eq!(view.total_amount, bananas.price * Decimal::from(2));
    assert_eq!(view.quantity_of("Bananas"), 2);

    let body = wire(&cart);
    assert_eq!(body["success"], true);
    assert_eq!(body["totalAmount"], "80.00");
    assert_eq!(body["currency"], "INR");
}

#[tokio::test]
async fn test_update_is_absolute_and_idempotent() {
    let shop = TestShop::new();
    shop.call("addItemToCart", json!({ "productName": "Milk" }))
        .await;

    for _ in 0..2 {
        let updated = shop
            .call(
                "updateCartItemQuantity",
                json!({ "productName": "Milk", "quantity": 3 }),
            )
            .await;
        assert!(updated.success, "{}", updated.message);
    }

    let cart = shop.call("getCartDetails", json!({})).await;
    let view = cart.cart().unwrap();
    let milk: Vec<_> = view.items.iter().filter(|i| i.name == "Milk").collect();
    assert_eq!(milk.len(), 1);
    assert_eq!(milk[0].quantity, 3);
}

#[tokio::test]
async fn test_stock_boundary() {
    let shop = TestShop::new();

    let ok = shop
        .call("addItemToCart", json!({ "productName": "Tomatoes", "quantity": 5 }))
        .await;
    assert!(ok.success, "{}", ok.message);

    let other = TestShop {
        user: UserId::random(),
        ..shop
    };
    let too_many = other
        .call("addItemToCart", json!({ "productName": "Tomatoes", "quantity": 6 }))
        .await;
    assert!(!too_many.success);
    assert_eq!(too_many.error, Some(ErrorCode::InsufficientStock));
    assert!(too_many.message.contains("only 5 available"), "{}", too_many.message);
}

#[tokio::test]
async fn test_repeated_add_counts_what_is_in_the_cart() {
    let shop = TestShop::new();
    shop.call("addItemToCart", json!({ "productName": "Tomatoes", "quantity": 4 }))
        .await;

    let response = shop
        .call("addItemToCart", json!({ "productName": "Tomatoes", "quantity": 2 }))
        .await;
    assert!(!response.success);
    assert!(response.message.contains("only 5 available"));
    assert!(response.message.contains("You already have 4"));
}

#[tokio::test]
async fn test_remove_misspelled_item() {
    let shop = TestShop::new();
    shop.call("addItemToCart", json!({ "productName": "Tomatoes", "quantity": 2 }))
        .await;
    shop.call("addItemToCart", json!({ "productName": "Onions" }))
        .await;

    let removed = shop
        .call("removeItemFromCart", json!({ "productName": "tomatoe" }))
        .await;
    assert!(removed.success, "{}", removed.message);

    let cart = shop.call("getCartDetails", json!({})).await;
    let view = cart.cart().unwrap();
    assert!(view.items.iter().all(|i| i.name != "Tomatoes"));
    assert_eq!(view.quantity_of("Onions"), 1);
}

#[tokio::test]
async fn test_remove_item_not_in_cart_lists_contents() {
    let shop = TestShop::new();
    shop.call("addItemToCart", json!({ "productName": "Milk" }))
        .await;

    let response = shop
        .call("removeItemFromCart", json!({ "productName": "Apples" }))
        .await;
    assert!(!response.success);
    assert_eq!(response.error, Some(ErrorCode::NotInCart));
    assert!(response.message.contains("Milk"));
}

#[tokio::test]
async fn test_named_product_missing_from_cart_leaves_similar_items_alone() {
    let shop = TestShop::new();
    shop.store
        .upsert_product(Product::new("Apple Juice", Decimal::new(90, 0), "litre", 10))
        .unwrap();
    shop.call("addItemToCart", json!({ "productName": "Apple Juice" }))
        .await;

    let response = shop
        .call("removeItemFromCart", json!({ "productName": "Apples" }))
        .await;
    assert!(!response.success, "{}", response.message);
    assert_eq!(response.error, Some(ErrorCode::NotInCart));
    assert!(response.message.contains("Apple Juice"));

    let cart = shop.call("getCartDetails", json!({})).await;
    assert_eq!(cart.cart().unwrap().quantity_of("Apple Juice"), 1);
}

#[tokio::test]
async fn test_add_sees_stock_changes_made_after_catalog_load() {
    let shop = TestShop::new();
    let onions = shop.product("Onions").await.unwrap().unwrap();
    shop.store.set_stock(onions.id, 2).unwrap();

    let response = shop
        .call("addItemToCart", json!({ "productName": "Onions", "quantity": 3 }))
        .await;
    assert_eq!(response.error, Some(ErrorCode::InsufficientStock));
    assert!(response.message.contains("only 2 available"), "{}", response.message);

    let ok = shop
        .call("addItemToCart", json!({ "productName": "Onions", "quantity": 2 }))
        .await;
    assert!(ok.success, "{}", ok.message);
}

#[tokio::test]
async fn test_out_of_stock_products_are_not_listed() {
    let shop = TestShop::new();
    let response = shop
        .call("getAvailableProducts", json!({ "limit": 50 }))
        .await;
    assert!(response.success);

    let body = wire(&response);
    let names: Vec<&str> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names.len(), 7);
    assert!(!names.contains(&"Saffron"));
}

#[tokio::test]
async fn test_signed_out_shopper_is_guided_to_sign_in() {
    let shop = TestShop::new();
    for tool in ["getCartDetails", "addItemToCart", "placeOrder"] {
        let response = shop
            .call_as(None, tool, json!({ "productName": "Milk" }))
            .await;
        assert!(!response.success, "{tool}");
        assert_eq!(response.error, Some(ErrorCode::Authentication), "{tool}");
    }

    let status = shop.call_as(None, "getUserStatus", json!({})).await;
    assert!(status.success);
    assert_eq!(wire(&status)["signedIn"], false);
}

#[tokio::test]
async fn test_snake_case_tool_names_are_accepted() {
    let shop = TestShop::new();
    let response = shop
        .call("add_item_to_cart", json!({ "product_name": "bananas" }))
        .await;
    assert!(response.success, "{}", response.message);
}
