//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })`.

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Serialize right away.
    ///
    /// Payloads borrowing from a catalog snapshot must be serialized while
    /// the snapshot is still held, so handlers return the finished
    /// [`Response`] instead of the typed envelope.
    pub fn render(data: T) -> Response {
        Json(DataResponse { data }).into_response()
    }
}
