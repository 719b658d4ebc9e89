// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session cookie required).
// Protected handlers take `AuthAdmin` as their first extractor, so a request
// without a valid session is rejected before any body is read.

pub mod protected;
pub mod public;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

/// 201 with a `Location` header pointing at the new resource.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}
