//! Core types for FreshCart.
//!
//! This module provides type-safe wrappers and entities for the grocery domain.

pub mod cart;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod profile;
pub mod status;

pub use cart::{CartLine, cart_item_count, cart_total};
pub use id::*;
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use price::{CurrencyCode, Price};
pub use product::{Category, CategoryRef, Product};
pub use profile::{DeliveryProfile, ProfileGap, UserProfile};
pub use status::*;
