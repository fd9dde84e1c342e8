use std::any::Any;

use axum::{
    Json,
    http::{
        HeaderValue, StatusCode,
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
    },
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// `{ "error": "..." }`, the only error body the public endpoints emit.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))],
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Used by `CatchPanicLayer`; the panic payload is logged, never returned.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "non-string panic payload"
    };

    error!(panic = %detail, "backend: handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_SERVER_ERROR_MESSAGE,
    )
}
