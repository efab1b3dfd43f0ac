//! Typed tool requests.
//!
//! The conversational host sends loosely typed argument objects. They are
//! validated once, here, into a [`ToolRequest`]; the resolver only ever sees
//! well-typed values. Argument keys may be camelCase or `snake_case`, and
//! quantities may arrive as numbers or numeric strings.

use std::fmt;
use std::str::FromStr;

use freshcart_core::OrderId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ToolError;

/// Default and maximum `getAvailableProducts` page sizes.
pub const DEFAULT_PRODUCT_LIMIT: usize = 10;
pub const MAX_PRODUCT_LIMIT: usize = 50;

/// Default and maximum `getPurchaseHistory` page sizes.
pub const DEFAULT_HISTORY_LIMIT: u32 = 3;
pub const MAX_HISTORY_LIMIT: u32 = 20;

/// Longest product name, category or search term accepted, in characters.
pub const MAX_TEXT_CHARS: usize = 100;

/// A tool invocation as received from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// The eight tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetCartDetails,
    AddItemToCart,
    RemoveItemFromCart,
    UpdateCartItemQuantity,
    GetAvailableProducts,
    GetPurchaseHistory,
    PlaceOrder,
    GetUserStatus,
}

impl ToolName {
    pub const ALL: [Self; 8] = [
        Self::GetCartDetails,
        Self::AddItemToCart,
        Self::RemoveItemFromCart,
        Self::UpdateCartItemQuantity,
        Self::GetAvailableProducts,
        Self::GetPurchaseHistory,
        Self::PlaceOrder,
        Self::GetUserStatus,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetCartDetails => "getCartDetails",
            Self::AddItemToCart => "addItemToCart",
            Self::RemoveItemFromCart => "removeItemFromCart",
            Self::UpdateCartItemQuantity => "updateCartItemQuantity",
            Self::GetAvailableProducts => "getAvailableProducts",
            Self::GetPurchaseHistory => "getPurchaseHistory",
            Self::PlaceOrder => "placeOrder",
            Self::GetUserStatus => "getUserStatus",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    /// Accepts the camelCase name or its `snake_case` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_').collect();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ToolError::UnknownTool(s.trim().to_string()))
    }
}

/// A validated tool request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    GetCartDetails,
    AddItemToCart {
        product_name: String,
        quantity: u32,
    },
    RemoveItemFromCart {
        product_name: String,
    },
    UpdateCartItemQuantity {
        product_name: String,
        quantity: u32,
    },
    GetAvailableProducts {
        category: Option<String>,
        search_term: Option<String>,
        limit: usize,
    },
    GetPurchaseHistory {
        limit: u32,
        order_id: Option<OrderId>,
    },
    PlaceOrder,
    GetUserStatus,
}

impl ToolRequest {
    #[must_use]
    pub const fn name(&self) -> ToolName {
        match self {
            Self::GetCartDetails => ToolName::GetCartDetails,
            Self::AddItemToCart { .. } => ToolName::AddItemToCart,
            Self::RemoveItemFromCart { .. } => ToolName::RemoveItemFromCart,
            Self::UpdateCartItemQuantity { .. } => ToolName::UpdateCartItemQuantity,
            Self::GetAvailableProducts { .. } => ToolName::GetAvailableProducts,
            Self::GetPurchaseHistory { .. } => ToolName::GetPurchaseHistory,
            Self::PlaceOrder => ToolName::PlaceOrder,
            Self::GetUserStatus => ToolName::GetUserStatus,
        }
    }
}

impl TryFrom<&ToolCall> for ToolRequest {
    type Error = ToolError;

    fn try_from(call: &ToolCall) -> Result<Self, Self::Error> {
        let name: ToolName = call.name.parse()?;
        parse_arguments(name, &call.arguments)
    }
}

// =============================================================================
// Raw argument shapes
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductArgs {
    #[serde(default, alias = "product_name", alias = "product", alias = "name")]
    product_name: Option<String>,
    #[serde(default)]
    quantity: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    #[serde(default)]
    category: Option<String>,
    #[serde(default, alias = "search_term", alias = "query")]
    search_term: Option<String>,
    #[serde(default)]
    limit: Option<Value>,
    #[serde(default, alias = "order_id")]
    order_id: Option<String>,
}

/// Validate `arguments` for tool `name`.
///
/// # Errors
///
/// Returns `InvalidArguments` or `NegativeQuantity` describing what to fix.
pub fn parse_arguments(name: ToolName, arguments: &Value) -> Result<ToolRequest, ToolError> {
    match name {
        ToolName::GetCartDetails => Ok(ToolRequest::GetCartDetails),
        ToolName::PlaceOrder => Ok(ToolRequest::PlaceOrder),
        ToolName::GetUserStatus => Ok(ToolRequest::GetUserStatus),
        ToolName::AddItemToCart => {
            let args: ProductArgs = decode(arguments)?;
            let product_name = required_product_name(args.product_name)?;
            let quantity = match args.quantity {
                None | Some(Value::Null) => 1,
                Some(raw) => clamp_add_quantity(number(&raw, "quantity")?),
            };
            Ok(ToolRequest::AddItemToCart {
                product_name,
                quantity,
            })
        }
        ToolName::RemoveItemFromCart => {
            let args: ProductArgs = decode(arguments)?;
            Ok(ToolRequest::RemoveItemFromCart {
                product_name: required_product_name(args.product_name)?,
            })
        }
        ToolName::UpdateCartItemQuantity => {
            let args: ProductArgs = decode(arguments)?;
            let product_name = required_product_name(args.product_name)?;
            let raw = args
                .quantity
                .filter(|v| !v.is_null())
                .ok_or_else(|| invalid("Please tell me the quantity you want."))?;
            let quantity = exact_quantity(number(&raw, "quantity")?)?;
            Ok(ToolRequest::UpdateCartItemQuantity {
                product_name,
                quantity,
            })
        }
        ToolName::GetAvailableProducts => {
            let args: ListArgs = decode(arguments)?;
            let limit = match args.limit {
                None | Some(Value::Null) => DEFAULT_PRODUCT_LIMIT,
                Some(raw) => clamp_limit(number(&raw, "limit")?, MAX_PRODUCT_LIMIT),
            };
            Ok(ToolRequest::GetAvailableProducts {
                category: bounded(non_blank(args.category), "category")?,
                search_term: bounded(non_blank(args.search_term), "search term")?,
                limit,
            })
        }
        ToolName::GetPurchaseHistory => {
            let args: ListArgs = decode(arguments)?;
            let limit = match args.limit {
                None | Some(Value::Null) => DEFAULT_HISTORY_LIMIT,
                Some(raw) => {
                    let max = usize::try_from(MAX_HISTORY_LIMIT).unwrap_or(usize::MAX);
                    u32::try_from(clamp_limit(number(&raw, "limit")?, max))
                        .unwrap_or(MAX_HISTORY_LIMIT)
                }
            };
            let order_id = non_blank(args.order_id)
                .map(|raw| {
                    raw.parse::<OrderId>()
                        .map_err(|_| invalid("That order number doesn't look right."))
                })
                .transpose()?;
            Ok(ToolRequest::GetPurchaseHistory { limit, order_id })
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn invalid(message: &str) -> ToolError {
    ToolError::InvalidArguments(message.to_string())
}

fn decode<T: for<'de> Deserialize<'de> + Default>(arguments: &Value) -> Result<T, ToolError> {
    if arguments.is_null() {
        return Ok(T::default());
    }
    T::deserialize(arguments)
        .map_err(|e| ToolError::InvalidArguments(format!("I couldn't read those details: {e}")))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_product_name(value: Option<String>) -> Result<String, ToolError> {
    bounded(non_blank(value), "product name")?
        .ok_or_else(|| invalid("Please tell me which product you mean."))
}

fn bounded(value: Option<String>, field: &str) -> Result<Option<String>, ToolError> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_CHARS => Err(ToolError::InvalidArguments(
            format!("That {field} is too long. Please keep it to {MAX_TEXT_CHARS} characters or fewer."),
        )),
        other => Ok(other),
    }
}

/// Read a number from a JSON number or a numeric string.
fn number(value: &Value, field: &str) -> Result<f64, ToolError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| ToolError::InvalidArguments(format!("The {field} must be a number.")))
}

/// Adds take whole units and at least one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_add_quantity(raw: f64) -> u32 {
    // `as` saturates for floats
    raw.floor().max(1.0) as u32
}

/// Absolute quantities must be non-negative whole numbers.
#[allow(clippy::cast_possible_truncation)]
fn exact_quantity(raw: f64) -> Result<u32, ToolError> {
    if raw < 0.0 {
        return Err(ToolError::NegativeQuantity(raw.floor() as i64));
    }
    if raw.fract() != 0.0 {
        return Err(invalid("The quantity must be a whole number."));
    }
    u32::try_from(raw as i64).map_err(|_| invalid("That quantity is too large."))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_limit(raw: f64, max: usize) -> usize {
    (raw.floor().max(1.0) as usize).min(max)
}
