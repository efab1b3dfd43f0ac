//! FreshCart Core - Shared types and product matching.
//!
//! This crate provides the domain model used across all FreshCart components:
//! - `storefront` - Tool resolver, cart/order workflows and the HTTP tool host
//! - `cli` - Command-line tools for migrations and operator diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, catalog, cart, order and profile types
//! - [`matching`] - Free-text product resolution with confidence scoring

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod matching;
pub mod types;

pub use matching::{MatchResult, find_product};
pub use types::*;
