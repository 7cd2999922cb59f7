//! API response types.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Success envelope: `{ "data": ... }`.
///
/// Errors are rendered by `AppError` as `{ "error": { "code", "message" } }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a success payload.
    pub const fn ok(data: T) -> Self {
        Self { data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Payload for commands that return nothing else.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

/// `{ "data": { "ok": true } }`.
#[must_use]
pub const fn ack() -> ApiResponse<Ack> {
    ApiResponse::ok(Ack { ok: true })
}
