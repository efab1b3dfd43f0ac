//! Shopper identity extractor.
//!
//! Sign-in happens at the managed backend; the gateway in front of this
//! service verifies the session and forwards the shopper's ID in
//! [`AUTHENTICATED_USER_HEADER`]. A request without the header is a
//! signed-out shopper, which is not an error here: each tool decides whether
//! it needs a user.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use freshcart_core::UserId;
use tracing::Span;

use crate::error::set_sentry_user;

/// Header carrying the authenticated shopper's ID.
pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";

/// Extractor for the current shopper, if signed in.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     match user {
///         Some(id) => format!("Hello, {id}!"),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Option<UserId>);

/// Error returned when the identity header is present but malformed.
#[derive(Debug)]
pub enum AuthRejection {
    /// The header was not a valid UUID.
    InvalidUserId,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidUserId => (
                StatusCode::BAD_REQUEST,
                format!("Invalid {AUTHENTICATED_USER_HEADER} header"),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHENTICATED_USER_HEADER) else {
            return Ok(Self(None));
        };

        let user_id: UserId = value
            .to_str()
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(AuthRejection::InvalidUserId)?;

        Span::current().record("user_id", tracing::field::display(user_id));
        set_sentry_user(&user_id);

        Ok(Self(Some(user_id)))
    }
}
