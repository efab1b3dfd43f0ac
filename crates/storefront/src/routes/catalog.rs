//! Catalog read endpoints.
//!
//! Plain JSON views over the catalog for the app and for operators checking
//! how free text resolves.

use axum::{
    Json,
    extract::{Query, State},
};
use freshcart_core::{Category, find_product};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::tools::{MAX_TEXT_CHARS, ToolCall, ToolName, ToolResponse};

/// Query parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
}

/// Query parameters for match diagnostics.
#[derive(Debug, Deserialize)]
pub struct MatchQueryParams {
    pub q: Option<String>,
}

/// List all categories.
///
/// GET /api/categories
///
/// # Errors
///
/// Returns `AppError::Storage` if categories cannot be loaded.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.store().fetch_categories().await?;
    Ok(Json(categories))
}

/// List in-stock products.
///
/// GET /api/products?category=&search=&limit=
///
/// Same filtering and envelope as `getAvailableProducts`; no sign-in needed.
pub async fn products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ToolResponse> {
    let call = ToolCall::new(
        ToolName::GetAvailableProducts.as_str(),
        json!({
            "category": query.category,
            "searchTerm": query.search,
            "limit": query.limit,
        }),
    );
    Json(state.resolver().execute(None, &call).await)
}

/// Resolve free text to a product and show how it matched.
///
/// GET /api/match?q=
///
/// # Errors
///
/// Returns `AppError::BadRequest` without `q`, or `AppError::Storage` if the
/// catalog cannot be loaded.
pub async fn match_product(
    State(state): State<AppState>,
    Query(params): Query<MatchQueryParams>,
) -> Result<Json<Value>> {
    let q = params
        .q
        .ok_or_else(|| AppError::BadRequest("missing q".to_string()))?;
    if q.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::BadRequest(format!(
            "q is longer than {MAX_TEXT_CHARS} characters"
        )));
    }

    state.catalog().ensure_loaded(state.store()).await?;
    let catalog = state.catalog().products();
    let result = find_product(&q, &catalog);

    let body = serde_json::to_value(&result).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(body))
}
