//! FreshCart Storefront library.
//!
//! This crate provides the grocery backend as a library, allowing it to be
//! tested and reused:
//!
//! - [`catalog`] - In-memory catalog snapshot with periodic refresh
//! - [`db`] - Storage seam ([`db::GroceryStore`]) with `PostgreSQL` and in-memory backends
//! - [`services`] - Cart state accessor and order placement workflow
//! - [`tools`] - The eight voice-assistant tools and their response envelope
//! - [`routes`] - HTTP tool host and catalog endpoints

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod tools;

use std::time::Duration;

use axum::{Router, middleware::from_fn};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the storefront router with request tracing.
///
/// Sentry layers are added by the binary around this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
