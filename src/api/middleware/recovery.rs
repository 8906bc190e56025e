//! Panic recovery middleware.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

/// Creates a layer that turns handler panics into `500` JSON errors.
///
/// The panic message is logged and never sent to the client.
pub fn layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_response as fn(Box<dyn Any + Send + 'static>) -> Response)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(panic = message, "Handler panicked");

    let body = json!({
        "error": {
            "code": "internal_error",
            "message": "Internal server error",
            "details": {}
        }
    });

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
