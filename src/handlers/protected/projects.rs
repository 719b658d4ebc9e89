// handlers/protected/projects.rs - project management

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::database::models::{Project, ProjectInput};
use crate::error::ApiError;
use crate::handlers::created;
use crate::middleware::{ApiJson, ApiPath, AuthAdmin};
use crate::state::AppState;

/// POST /api/projects
pub async fn create(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<Response, ApiError> {
    let input = input.into_valid()?;
    let project = state.store.create_project(&input).await?;
    Ok(created(format!("/api/projects/{}", project.id), project))
}

/// PUT /api/projects/:id
pub async fn update(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ProjectInput>,
) -> Result<Json<Project>, ApiError> {
    let input = input.into_valid()?;
    Ok(Json(state.store.update_project(id, &input).await?))
}

/// DELETE /api/projects/:id
pub async fn delete(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
