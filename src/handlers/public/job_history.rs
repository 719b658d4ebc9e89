// handlers/public/job_history.rs - career timeline

use axum::{extract::State, Json};

use crate::database::models::JobHistory;
use crate::error::ApiError;
use crate::middleware::ApiPath;
use crate::state::AppState;

/// GET /api/jobhistory
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<JobHistory>>, ApiError> {
    Ok(Json(state.store.list_jobs().await?))
}

/// GET /api/jobhistory/:id
pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<JobHistory>, ApiError> {
    state
        .store
        .find_job(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Job history entry not found."))
}
