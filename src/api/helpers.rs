//! Response builders shared by the route handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub const HEALTH_BODY: &str = "OK";

/// Returns a 200 OK response with an empty body.
#[must_use]
pub fn ok_empty() -> Response {
    StatusCode::OK.into_response()
}

/// Echoes the endpoint verification challenge.
#[must_use]
pub fn ok_challenge(challenge: &str) -> Response {
    (StatusCode::OK, Json(json!({ "challenge": challenge }))).into_response()
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[must_use]
pub fn unauthorized() -> Response {
    err_response(StatusCode::UNAUTHORIZED, "Invalid Slack signature")
}
