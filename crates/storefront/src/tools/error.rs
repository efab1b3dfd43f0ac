//! Tool failure taxonomy.

use freshcart_core::{OrderId, ProfileGap};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CartStateError, OrderError};

/// Machine-readable failure code carried in every failed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Authentication,
    ProductNotFound,
    NotInCart,
    InsufficientStock,
    EmptyCart,
    IncompleteProfile,
    NoOrders,
    Unavailable,
}

/// Everything that can make a tool call fail.
///
/// Converted into a `success: false` envelope at the tool boundary; see
/// `From<ToolError> for ToolResponse`.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("negative quantity {0}")]
    NegativeQuantity(i64),

    #[error("not signed in")]
    Unauthenticated,

    #[error("no product matches {query:?}")]
    ProductNotFound {
        query: String,
        suggestions: Vec<String>,
    },

    #[error("{product} is not in the cart")]
    NotInCart {
        product: String,
        cart_items: Vec<String>,
    },

    #[error("only {available} of {product} available, {requested} requested")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
        in_cart: u32,
    },

    #[error("cart is empty")]
    EmptyCart,

    #[error("profile incomplete: {0:?}")]
    IncompleteProfile(Vec<ProfileGap>),

    #[error("no orders found")]
    NoOrders { order_id: Option<OrderId> },

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("order failed: {0}")]
    Order(#[source] OrderError),
}

impl ToolError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownTool(_) | Self::InvalidArguments(_) | Self::NegativeQuantity(_) => {
                ErrorCode::Validation
            }
            Self::Unauthenticated => ErrorCode::Authentication,
            Self::ProductNotFound { .. } => ErrorCode::ProductNotFound,
            Self::NotInCart { .. } => ErrorCode::NotInCart,
            Self::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            Self::EmptyCart => ErrorCode::EmptyCart,
            Self::IncompleteProfile(_) => ErrorCode::IncompleteProfile,
            Self::NoOrders { .. } => ErrorCode::NoOrders,
            Self::Storage(_) | Self::Order(_) => ErrorCode::Unavailable,
        }
    }

    /// Whether this is a dependency failure rather than an anticipated one.
    #[must_use]
    pub const fn is_dependency_failure(&self) -> bool {
        matches!(self.code(), ErrorCode::Unavailable)
    }
}

impl From<CartStateError> for ToolError {
    fn from(err: CartStateError) -> Self {
        match err {
            CartStateError::Unauthenticated => Self::Unauthenticated,
            CartStateError::Storage(e) => Self::Storage(e),
        }
    }
}

impl From<OrderError> for ToolError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => Self::EmptyCart,
            other => Self::Order(other),
        }
    }
}
