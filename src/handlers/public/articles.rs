// handlers/public/articles.rs - published articles

use axum::{extract::State, Json};

use crate::database::models::{Article, ArticleSummary};
use crate::error::ApiError;
use crate::middleware::ApiPath;
use crate::state::AppState;

/// GET /api/articles - published summaries, newest first
pub async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<ArticleSummary>>, ApiError> {
    Ok(Json(state.store.list_published_articles().await?))
}

/// GET /api/articles/:slug - one published article
pub async fn get_by_slug(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Article>, ApiError> {
    state
        .store
        .find_published_article(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Article not found."))
}
