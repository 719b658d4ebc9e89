// handlers/protected/job_history.rs - career timeline management

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::database::models::{JobHistory, JobHistoryInput};
use crate::error::ApiError;
use crate::handlers::created;
use crate::middleware::{ApiJson, ApiPath, AuthAdmin};
use crate::state::AppState;

/// POST /api/jobhistory
pub async fn create(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<JobHistoryInput>,
) -> Result<Response, ApiError> {
    let input = input.into_valid()?;
    let job = state.store.create_job(&input).await?;
    Ok(created(format!("/api/jobhistory/{}", job.id), job))
}

/// PUT /api/jobhistory/:id
pub async fn update(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<JobHistoryInput>,
) -> Result<Json<JobHistory>, ApiError> {
    let input = input.into_valid()?;
    Ok(Json(state.store.update_job(id, &input).await?))
}

/// DELETE /api/jobhistory/:id
pub async fn delete(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_job(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
