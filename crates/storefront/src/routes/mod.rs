//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (storage reachable)
//!
//! # Tools (voice assistant)
//! GET  /api/tools              - Tool definitions with JSON Schemas
//! POST /api/tools/{name}       - Execute a tool; body is the arguments object
//!
//! # Catalog
//! GET  /api/categories         - All categories
//! GET  /api/products           - In-stock products (?category, ?search, ?limit)
//! GET  /api/match?q=           - Resolve free text to a product (diagnostics)
//! ```
//!
//! The shopper is identified by the `x-authenticated-user` header; see
//! [`crate::middleware::CurrentUser`].

pub mod catalog;
pub mod health;
pub mod tools;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the tool routes router.
pub fn tool_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(tools::list))
        .route("/{name}", post(tools::call))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/tools", tool_routes())
        .route("/api/categories", get(catalog::categories))
        .route("/api/products", get(catalog::products))
        .route("/api/match", get(catalog::match_product))
}
