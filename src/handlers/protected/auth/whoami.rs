// handlers/protected/auth/whoami.rs - GET /auth/me handler

use axum::Json;
use serde_json::{json, Value};

use crate::middleware::AuthAdmin;

/// GET /auth/me - the email of the signed-in admin
pub async fn me_get(admin: AuthAdmin) -> Json<Value> {
    Json(json!({ "email": admin.email }))
}
