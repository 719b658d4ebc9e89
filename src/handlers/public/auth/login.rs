// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::session_cookie;
use crate::error::{ApiError, Validator};
use crate::middleware::ApiJson;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/login - exchange admin credentials for a session cookie.
///
/// Unknown email and wrong password produce the same 401 body, and both pay
/// for one argon2 verification.
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let mut v = Validator::new();
    v.require("email", &body.email);
    v.require("password", &body.password);
    v.finish()?;

    let LoginRequest { email, password } = body;
    // Seeding trims ADMIN_EMAIL the same way; case is still significant.
    let email = email.trim().to_string();
    let admin = state.store.find_admin_by_email(&email).await?;

    let passwords = state.passwords.clone();
    let verified = tokio::task::spawn_blocking(move || match admin {
        Some(admin) => passwords.verify(&password, &admin.password_hash),
        None => passwords.reject_unknown(&password),
    })
    .await
    .map_err(|e| ApiError::internal(format!("password verification task failed: {}", e)))?;

    if !verified {
        tracing::warn!(email = %email, "login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state.tokens.issue(&email)?;
    tracing::info!(email = %email, jti = %issued.claims.jti, "login succeeded");

    Ok((
        [(header::SET_COOKIE, session_cookie(&issued))],
        Json(json!({ "message": "Login successful." })),
    )
        .into_response())
}
