//! Errors for the catalog routes, reported to Sentry.
//!
//! Catalog routes return [`Result`]; failures answer with a small JSON body
//! `{ "error": <code>, "message": <text> }`. Tool routes never fail this way:
//! they always answer with a tool envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;

/// Failure of a catalog route.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage could not serve the request.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// The query string was missing or unusable.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Storage(RepositoryError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            Self::Storage(RepositoryError::Unavailable(_)) => "unavailable",
            Self::Storage(_) | Self::Internal(_) => "internal",
            Self::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Catalog request failed"
            );
            // Storage details stay in the logs
            "The grocery service is having trouble right now. Please try again.".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": self.code(), "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called once the gateway-supplied user has been parsed so errors are
/// associated with the shopper.
pub fn set_sentry_user(user_id: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            ..Default::default()
        }));
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of tool
/// calls leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("tool", "addItemToCart", Some(&[("success", "true")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
