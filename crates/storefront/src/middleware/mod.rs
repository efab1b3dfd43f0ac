//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Shopper identity is resolved per handler by the [`CurrentUser`] extractor
//! from the header set by the authenticating gateway.

pub mod auth;
pub mod request_id;

pub use auth::{AUTHENTICATED_USER_HEADER, AuthRejection, CurrentUser};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
