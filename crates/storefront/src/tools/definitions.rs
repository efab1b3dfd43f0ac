//! Tool definitions published to the conversational host.

use serde::Serialize;
use serde_json::json;

use super::request::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_PRODUCT_LIMIT, MAX_HISTORY_LIMIT, MAX_PRODUCT_LIMIT, ToolName,
};

/// A callable tool: name, description and JSON Schema for its arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    /// Name of the tool.
    pub name: String,
    /// What the tool does, written for the assistant.
    pub description: String,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: serde_json::Value,
    /// Whether the tool changes cart or order state.
    #[serde(skip)]
    pub mutates: bool,
}

/// All grocery tools, in the order they are presented to the assistant.
#[must_use]
pub fn grocery_tools() -> Vec<Tool> {
    ToolName::ALL.into_iter().map(definition).collect()
}

/// Get a tool by name (camelCase or `snake_case`).
#[must_use]
pub fn get_tool_by_name(name: &str) -> Option<Tool> {
    name.parse::<ToolName>().ok().map(definition)
}

fn no_arguments() -> serde_json::Value {
    json!({ "type": "object", "properties": {} })
}

#[allow(clippy::too_many_lines)]
fn definition(name: ToolName) -> Tool {
    let (description, input_schema, mutates) = match name {
        ToolName::GetCartDetails => (
            "Get the shopper's current cart: every item with quantity and price, the total \
             and the item count. Always call this before telling the shopper their total.",
            no_arguments(),
            false,
        ),
        ToolName::AddItemToCart => (
            "Add a product to the cart by name. Misspelled or partial names are resolved \
             against the catalog; if the product is already in the cart its quantity is \
             increased.",
            json!({
                "type": "object",
                "properties": {
                    "productName": {
                        "type": "string",
                        "description": "Product name as the shopper said it (e.g. 'bananas', 'fresh tomatoe')"
                    },
                    "quantity": {
                        "type": "integer",
                        "description": "Number of units to add (default 1)",
                        "minimum": 1
                    }
                },
                "required": ["productName"]
            }),
            true,
        ),
        ToolName::RemoveItemFromCart => (
            "Remove a product from the cart entirely.",
            json!({
                "type": "object",
                "properties": {
                    "productName": {
                        "type": "string",
                        "description": "Name of the product to remove"
                    }
                },
                "required": ["productName"]
            }),
            true,
        ),
        ToolName::UpdateCartItemQuantity => (
            "Set the quantity of a product already in the cart. The quantity is the new \
             total, not an increment; 0 removes the product.",
            json!({
                "type": "object",
                "properties": {
                    "productName": {
                        "type": "string",
                        "description": "Name of the product in the cart"
                    },
                    "quantity": {
                        "type": "integer",
                        "description": "New quantity (0 removes the item)",
                        "minimum": 0
                    }
                },
                "required": ["productName", "quantity"]
            }),
            true,
        ),
        ToolName::GetAvailableProducts => (
            "List in-stock products with price, unit, category, description and stock. \
             Optionally filter by category and a search term.",
            json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Category name or part of it (e.g. 'fruit', 'dairy')"
                    },
                    "searchTerm": {
                        "type": "string",
                        "description": "Words to search product names and descriptions for"
                    },
                    "limit": {
                        "type": "integer",
                        "description": format!(
                            "Number of products to return (1-{MAX_PRODUCT_LIMIT}, default {DEFAULT_PRODUCT_LIMIT})"
                        ),
                        "minimum": 1,
                        "maximum": MAX_PRODUCT_LIMIT
                    }
                }
            }),
            false,
        ),
        ToolName::GetPurchaseHistory => (
            "Get the shopper's past orders, newest first, with their items. Pass orderId \
             to look up one specific order.",
            json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "description": format!(
                            "Number of orders to return (1-{MAX_HISTORY_LIMIT}, default {DEFAULT_HISTORY_LIMIT})"
                        ),
                        "minimum": 1,
                        "maximum": MAX_HISTORY_LIMIT
                    },
                    "orderId": {
                        "type": "string",
                        "description": "Order ID to look up"
                    }
                }
            }),
            false,
        ),
        ToolName::PlaceOrder => (
            "Place an order for everything in the cart, delivered to the name, phone and \
             address on the shopper's profile. Confirm with the shopper before calling.",
            no_arguments(),
            true,
        ),
        ToolName::GetUserStatus => (
            "Check whether the shopper is signed in, how many items are in their cart and \
             whether their profile has the phone and address needed for delivery.",
            no_arguments(),
            false,
        ),
    };

    Tool {
        name: name.as_str().to_string(),
        description: description.to_string(),
        input_schema,
        mutates,
    }
}
