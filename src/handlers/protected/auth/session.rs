// handlers/protected/auth/session.rs - POST /auth/logout handler

use axum::{
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::auth::clear_session_cookie;
use crate::middleware::AuthAdmin;

/// POST /auth/logout - overwrite the session cookie with an expired one.
///
/// The token itself stays valid until its own expiry; nothing is revoked
/// server-side.
pub async fn logout_post(admin: AuthAdmin) -> impl IntoResponse {
    tracing::info!(email = %admin.email, "logout");
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out." })),
    )
}
