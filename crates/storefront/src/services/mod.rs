//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `cart` - Authoritative cart state, re-read from storage on every use
//! - `orders` - Order placement with compensating rollback

pub mod cart;
pub mod orders;

pub use cart::{CartState, CartStateAccessor, CartStateError};
pub use orders::{OrderError, OrderPlacement, PlacedOrder};
