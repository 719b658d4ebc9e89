// handlers/protected/articles.rs - article management

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::database::models::{Article, ArticleInput};
use crate::error::ApiError;
use crate::handlers::created;
use crate::middleware::{ApiJson, ApiPath, AuthAdmin};
use crate::state::AppState;

/// GET /api/articles/all - drafts included, newest first
pub async fn list_all(_admin: AuthAdmin, State(state): State<AppState>) -> Result<Json<Vec<Article>>, ApiError> {
    Ok(Json(state.store.list_all_articles().await?))
}

/// POST /api/articles
pub async fn create(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ArticleInput>,
) -> Result<Response, ApiError> {
    let input = input.into_valid()?;
    let article = state.store.create_article(&input).await?;
    tracing::info!(id = article.id, slug = %article.slug, "article created");
    Ok(created(format!("/api/articles/{}", article.slug), article))
}

/// PUT /api/articles/:id
pub async fn update(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ArticleInput>,
) -> Result<Json<Article>, ApiError> {
    let input = input.into_valid()?;
    Ok(Json(state.store.update_article(id, &input).await?))
}

/// DELETE /api/articles/:id
pub async fn delete(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete_article(id).await?;
    tracing::info!(id, "article deleted");
    Ok(StatusCode::NO_CONTENT)
}
