//! Tool host endpoints for the voice assistant.
//!
//! Every call answers `200 OK` with a tool envelope, including failures: the
//! assistant reads `success` and `message`, not the HTTP status.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde_json::Value;

use crate::error::add_breadcrumb;
use crate::middleware::CurrentUser;
use crate::state::AppState;
use crate::tools::{ErrorCode, Tool, ToolCall, ToolResponse, grocery_tools};

/// List the tool definitions.
///
/// GET /api/tools
pub async fn list() -> Json<Vec<Tool>> {
    Json(grocery_tools())
}

/// Execute one tool.
///
/// POST /api/tools/{name}
///
/// The body is the arguments object; an empty body means no arguments.
pub async fn call(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(name): Path<String>,
    body: Bytes,
) -> Json<ToolResponse> {
    let arguments = match parse_body(&body) {
        Ok(arguments) => arguments,
        Err(e) => {
            tracing::debug!(tool = %name, error = %e, "Malformed tool body");
            return Json(ToolResponse::failure(
                ErrorCode::Validation,
                "I couldn't read that request. Please try again.",
            ));
        }
    };

    let call = ToolCall::new(name, arguments);
    let response = state.resolver().execute(user, &call).await;

    add_breadcrumb(
        "tool",
        &call.name,
        Some(&[("success", if response.success { "true" } else { "false" })]),
    );

    Json(response)
}

fn parse_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_body_is_null() {
        assert_eq!(parse_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
    }

    #[test]
    fn test_body_is_parsed() {
        assert_eq!(
            parse_body(br#"{"productName":"milk"}"#).unwrap(),
            json!({ "productName": "milk" })
        );
        assert!(parse_body(b"{not json").is_err());
    }
}
