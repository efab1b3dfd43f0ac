//! Tool diagnostics: list definitions and execute calls against the database.
//!
//! # Usage
//!
//! ```bash
//! fc-cli tools list
//! fc-cli tools call getCartDetails --user 6f1c8a52-3d43-4f4e-9d0e-3c2b6f0f8a11
//! fc-cli tools call addItemToCart --user <uuid> --args '{"productName":"bananas","quantity":2}'
//! ```

use std::sync::Arc;

use freshcart_core::{CurrencyCode, UserId};
use freshcart_storefront::db::{GroceryStore, PgStore};
use freshcart_storefront::state::AppState;
use freshcart_storefront::tools::{ToolCall, grocery_tools};
use serde_json::Value;
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur while running a tool.
#[derive(Debug, Error)]
pub enum ToolCommandError {
    #[error("Invalid --args JSON: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    #[error("Invalid --currency: {0}")]
    InvalidCurrency(String),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Could not render output: {0}")]
    Render(#[source] serde_json::Error),
}

/// Print every tool definition as JSON.
pub fn list() -> Result<(), ToolCommandError> {
    let json = serde_json::to_string_pretty(&grocery_tools()).map_err(ToolCommandError::Render)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}

/// Execute one tool call and print the envelope.
///
/// Failures inside the tool are part of the envelope; only setup problems
/// are returned as errors.
pub async fn call(
    name: &str,
    user: Option<UserId>,
    arguments: Option<&str>,
    currency: &str,
) -> Result<(), ToolCommandError> {
    let arguments = match arguments {
        Some(raw) => serde_json::from_str(raw).map_err(ToolCommandError::InvalidArguments)?,
        None => Value::Null,
    };
    let currency: CurrencyCode = currency
        .parse()
        .map_err(ToolCommandError::InvalidCurrency)?;

    let pool = connect().await?;
    let store: Arc<dyn GroceryStore> = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, currency);

    let response = state
        .resolver()
        .execute(user, &ToolCall::new(name, arguments))
        .await;

    let json = serde_json::to_string_pretty(&response).map_err(ToolCommandError::Render)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
