// handlers/public/projects.rs - project showcase

use axum::{extract::State, Json};

use crate::database::models::Project;
use crate::error::ApiError;
use crate::middleware::ApiPath;
use crate::state::AppState;

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(state.store.list_projects().await?))
}

/// GET /api/projects/:id
pub async fn get_by_id(State(state): State<AppState>, ApiPath(id): ApiPath<i32>) -> Result<Json<Project>, ApiError> {
    state
        .store
        .find_project(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Project not found."))
}
