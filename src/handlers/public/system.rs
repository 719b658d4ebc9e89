// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service descriptor
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Portfolio API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Content backend for a personal portfolio site",
        "endpoints": {
            "auth": "/auth/login, /auth/logout, /auth/me (also under /api/auth)",
            "articles": "/api/articles[/:slug] (public), /api/articles/all (admin)",
            "projects": "/api/projects[/:id]",
            "jobhistory": "/api/jobhistory[/:id]",
            "cv": "/api/cv, /api/cv/download",
            "health": "/health",
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
