//! Voice-assistant tools.
//!
//! Eight tools let a conversational agent drive the same cart and order
//! operations as the app:
//!
//! | Tool | Signed in | Mutates |
//! |------|-----------|---------|
//! | `getCartDetails` | required | no |
//! | `addItemToCart` | required | yes |
//! | `removeItemFromCart` | required | yes |
//! | `updateCartItemQuantity` | required | yes |
//! | `getAvailableProducts` | optional | no |
//! | `getPurchaseHistory` | required | no |
//! | `placeOrder` | required | yes |
//! | `getUserStatus` | optional | no |
//!
//! Arguments are validated into a [`ToolRequest`] at the boundary, executed
//! by the [`ToolResolver`] and answered with a [`ToolResponse`] envelope.

mod definitions;
mod error;
mod request;
mod resolver;
mod response;

pub use definitions::{Tool, get_tool_by_name, grocery_tools};
pub use error::{ErrorCode, ToolError};
pub use request::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_PRODUCT_LIMIT, MAX_HISTORY_LIMIT, MAX_PRODUCT_LIMIT,
    MAX_TEXT_CHARS, ToolCall, ToolName, ToolRequest, parse_arguments,
};
pub use resolver::ToolResolver;
pub use response::{
    CartChangeView, CartContentsView, CartItemView, CartView, HistoryView, MatchedProduct,
    MissingProfileView, OrderItemView, OrderPlacedView, OrderView, ProductListView, ProductView,
    StockView, SuggestionsView, ToolPayload, ToolResponse, UserStatusView, format_amount, money,
};
