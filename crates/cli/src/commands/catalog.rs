//! Catalog diagnostics.
//!
//! Shows how free text resolves against the live catalog, which is the first
//! thing to check when the assistant picks the wrong product.
//!
//! # Usage
//!
//! ```bash
//! fc-cli catalog match "tomatoe"
//! fc-cli catalog list
//! ```

use freshcart_core::find_product;
use freshcart_storefront::db::{GroceryStore, PgStore, RepositoryError};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur while inspecting the catalog.
#[derive(Debug, Error)]
pub enum CatalogCommandError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Could not load catalog: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Could not render output: {0}")]
    Render(#[from] serde_json::Error),
}

/// Resolve `query` and print the match result.
pub async fn match_query(query: &str) -> Result<(), CatalogCommandError> {
    let store = PgStore::new(connect().await?);
    let catalog = store.fetch_catalog().await?;
    tracing::info!(products = catalog.len(), "Catalog loaded");

    let result = find_product(query, &catalog);
    let json = serde_json::to_string_pretty(&result)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}

/// Print every product with its stock, one per line.
pub async fn list() -> Result<(), CatalogCommandError> {
    let store = PgStore::new(connect().await?);
    let catalog = store.fetch_catalog().await?;

    #[allow(clippy::print_stdout)]
    {
        for product in &catalog {
            println!(
                "{:<32} {:>10} /{:<8} stock {:>5}  {}",
                product.name,
                product.price,
                product.unit,
                product.stock_quantity,
                product.category_name().unwrap_or("-"),
            );
        }
    }
    Ok(())
}
