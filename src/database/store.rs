use async_trait::async_trait;
use thiserror::Error;

use super::models::{
    Admin, Article, ArticleInput, ArticleSummary, CvFile, CvInfo, JobHistory, NewCvFile, Project, ProjectInput,
    ValidJobHistory,
};

/// Errors surfaced by any `PortfolioStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Flat persistence for every resource the API serves.
///
/// Writes that break a uniqueness rule fail with `StoreError::Conflict`;
/// updates and deletes of a missing id fail with `StoreError::NotFound`.
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn health_check(&self) -> StoreResult<()>;

    // Admin credential
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>>;
    async fn insert_admin(&self, email: &str, password_hash: &str) -> StoreResult<Admin>;

    // Articles
    async fn list_published_articles(&self) -> StoreResult<Vec<ArticleSummary>>;
    async fn find_published_article(&self, slug: &str) -> StoreResult<Option<Article>>;
    async fn list_all_articles(&self) -> StoreResult<Vec<Article>>;
    async fn create_article(&self, input: &ArticleInput) -> StoreResult<Article>;
    async fn update_article(&self, id: i32, input: &ArticleInput) -> StoreResult<Article>;
    async fn delete_article(&self, id: i32) -> StoreResult<()>;

    // Projects
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn find_project(&self, id: i32) -> StoreResult<Option<Project>>;
    async fn create_project(&self, input: &ProjectInput) -> StoreResult<Project>;
    async fn update_project(&self, id: i32, input: &ProjectInput) -> StoreResult<Project>;
    async fn delete_project(&self, id: i32) -> StoreResult<()>;

    // Job history
    async fn list_jobs(&self) -> StoreResult<Vec<JobHistory>>;
    async fn find_job(&self, id: i32) -> StoreResult<Option<JobHistory>>;
    async fn create_job(&self, input: &ValidJobHistory) -> StoreResult<JobHistory>;
    async fn update_job(&self, id: i32, input: &ValidJobHistory) -> StoreResult<JobHistory>;
    async fn delete_job(&self, id: i32) -> StoreResult<()>;

    // CV
    async fn current_cv_info(&self) -> StoreResult<Option<CvInfo>>;
    async fn current_cv(&self) -> StoreResult<Option<CvFile>>;
    /// Removes every stored CV and stores `file` in one step.
    async fn replace_cv(&self, file: NewCvFile) -> StoreResult<CvInfo>;
    async fn delete_cv(&self, id: i32) -> StoreResult<()>;
}

pub(crate) fn article_not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("Article {} not found.", id))
}

pub(crate) fn project_not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("Project {} not found.", id))
}

pub(crate) fn job_not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("Job history entry {} not found.", id))
}

pub(crate) fn cv_not_found(id: i32) -> StoreError {
    StoreError::NotFound(format!("CV {} not found.", id))
}

pub(crate) fn slug_conflict(slug: &str) -> StoreError {
    StoreError::Conflict(format!("An article with slug '{}' already exists.", slug))
}

pub(crate) fn admin_conflict(email: &str) -> StoreError {
    StoreError::Conflict(format!("Admin '{}' already exists.", email))
}
