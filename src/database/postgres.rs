use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use super::models::{
    Admin, Article, ArticleInput, ArticleSummary, CvFile, CvInfo, JobHistory, NewCvFile, Project, ProjectInput,
    ValidJobHistory,
};
use super::store::{
    admin_conflict, article_not_found, cv_not_found, job_not_found, project_not_found, slug_conflict,
    PortfolioStore, StoreError, StoreResult,
};
use crate::config::DatabaseConfig;

const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS admins (
        id SERIAL PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS articles (
        id SERIAL PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        slug VARCHAR(200) NOT NULL UNIQUE,
        content TEXT NOT NULL,
        excerpt VARCHAR(500),
        published BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS projects (
        id SERIAL PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        description TEXT NOT NULL,
        tech_stack TEXT,
        live_url TEXT,
        github_url TEXT,
        image_url TEXT,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS job_history (
        id SERIAL PRIMARY KEY,
        company VARCHAR(200) NOT NULL,
        role VARCHAR(200) NOT NULL,
        description TEXT,
        start_date TIMESTAMPTZ NOT NULL,
        end_date TIMESTAMPTZ,
        is_current_role BOOLEAN NOT NULL DEFAULT FALSE,
        sort_order INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS cv_files (
        id SERIAL PRIMARY KEY,
        file_name TEXT NOT NULL,
        content_type TEXT NOT NULL,
        data BYTEA NOT NULL,
        uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
];

const ARTICLE_COLUMNS: &str = "id, title, slug, content, excerpt, published, created_at, updated_at";
const PROJECT_COLUMNS: &str =
    "id, title, description, tech_stack, live_url, github_url, image_url, sort_order, created_at";
const JOB_COLUMNS: &str = "id, company, role, description, start_date, end_date, is_current_role, sort_order";

/// PostgreSQL-backed store over a single connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects using the configured pool limits and bootstraps the schema.
    pub async fn connect(url: &str, config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Connected to PostgreSQL (max_connections={})", config.max_connections);
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |code| code == UNIQUE_VIOLATION)
}

/// Maps a unique-key failure to the given conflict; everything else passes through.
fn or_conflict(err: sqlx::Error, conflict: impl FnOnce() -> StoreError) -> StoreError {
    if is_unique_violation(&err) {
        conflict()
    } else {
        StoreError::Sqlx(err)
    }
}

fn expect_one_deleted(rows: u64, missing: impl FnOnce() -> StoreError) -> StoreResult<()> {
    if rows == 0 {
        Err(missing())
    } else {
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>("SELECT id, email, password_hash FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn insert_admin(&self, email: &str, password_hash: &str) -> StoreResult<Admin> {
        sqlx::query_as::<_, Admin>(
            "INSERT INTO admins (email, password_hash) VALUES ($1, $2) RETURNING id, email, password_hash",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| or_conflict(e, || admin_conflict(email)))
    }

    async fn list_published_articles(&self) -> StoreResult<Vec<ArticleSummary>> {
        let rows = sqlx::query_as::<_, ArticleSummary>(
            "SELECT id, title, slug, excerpt, created_at FROM articles \
             WHERE published ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_published_article(&self, slug: &str) -> StoreResult<Option<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE slug = $1 AND published", ARTICLE_COLUMNS);
        let row = sqlx::query_as::<_, Article>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_all_articles(&self) -> StoreResult<Vec<Article>> {
        let sql = format!("SELECT {} FROM articles ORDER BY created_at DESC, id DESC", ARTICLE_COLUMNS);
        Ok(sqlx::query_as::<_, Article>(&sql).fetch_all(&self.pool).await?)
    }

    async fn create_article(&self, input: &ArticleInput) -> StoreResult<Article> {
        let sql = format!(
            "INSERT INTO articles (title, slug, content, excerpt, published) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            ARTICLE_COLUMNS
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(&input.excerpt)
            .bind(input.published)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| or_conflict(e, || slug_conflict(&input.slug)))
    }

    async fn update_article(&self, id: i32, input: &ArticleInput) -> StoreResult<Article> {
        let sql = format!(
            "UPDATE articles SET title = $2, slug = $3, content = $4, excerpt = $5, published = $6, \
             updated_at = now() WHERE id = $1 RETURNING {}",
            ARTICLE_COLUMNS
        );
        sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.content)
            .bind(&input.excerpt)
            .bind(input.published)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| or_conflict(e, || slug_conflict(&input.slug)))?
            .ok_or_else(|| article_not_found(id))
    }

    async fn delete_article(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_deleted(result.rows_affected(), || article_not_found(id))
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let sql = format!(
            "SELECT {} FROM projects ORDER BY sort_order ASC, created_at DESC, id DESC",
            PROJECT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Project>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_project(&self, id: i32) -> StoreResult<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE id = $1", PROJECT_COLUMNS);
        Ok(sqlx::query_as::<_, Project>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_project(&self, input: &ProjectInput) -> StoreResult<Project> {
        let sql = format!(
            "INSERT INTO projects (title, description, tech_stack, live_url, github_url, image_url, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            PROJECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Project>(&sql)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tech_stack)
            .bind(&input.live_url)
            .bind(&input.github_url)
            .bind(&input.image_url)
            .bind(input.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_project(&self, id: i32, input: &ProjectInput) -> StoreResult<Project> {
        let sql = format!(
            "UPDATE projects SET title = $2, description = $3, tech_stack = $4, live_url = $5, \
             github_url = $6, image_url = $7, sort_order = $8 WHERE id = $1 RETURNING {}",
            PROJECT_COLUMNS
        );
        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.tech_stack)
            .bind(&input.live_url)
            .bind(&input.github_url)
            .bind(&input.image_url)
            .bind(input.order)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| project_not_found(id))
    }

    async fn delete_project(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_deleted(result.rows_affected(), || project_not_found(id))
    }

    async fn list_jobs(&self) -> StoreResult<Vec<JobHistory>> {
        let sql = format!(
            "SELECT {} FROM job_history ORDER BY sort_order ASC, start_date DESC, id DESC",
            JOB_COLUMNS
        );
        Ok(sqlx::query_as::<_, JobHistory>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_job(&self, id: i32) -> StoreResult<Option<JobHistory>> {
        let sql = format!("SELECT {} FROM job_history WHERE id = $1", JOB_COLUMNS);
        Ok(sqlx::query_as::<_, JobHistory>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_job(&self, input: &ValidJobHistory) -> StoreResult<JobHistory> {
        let sql = format!(
            "INSERT INTO job_history (company, role, description, start_date, end_date, is_current_role, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobHistory>(&sql)
            .bind(&input.company)
            .bind(&input.role)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_current_role)
            .bind(input.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_job(&self, id: i32, input: &ValidJobHistory) -> StoreResult<JobHistory> {
        let sql = format!(
            "UPDATE job_history SET company = $2, role = $3, description = $4, start_date = $5, \
             end_date = $6, is_current_role = $7, sort_order = $8 WHERE id = $1 RETURNING {}",
            JOB_COLUMNS
        );
        sqlx::query_as::<_, JobHistory>(&sql)
            .bind(id)
            .bind(&input.company)
            .bind(&input.role)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_current_role)
            .bind(input.order)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| job_not_found(id))
    }

    async fn delete_job(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM job_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_deleted(result.rows_affected(), || job_not_found(id))
    }

    async fn current_cv_info(&self) -> StoreResult<Option<CvInfo>> {
        let row = sqlx::query_as::<_, CvInfo>(
            "SELECT id, file_name, content_type, uploaded_at FROM cv_files \
             ORDER BY uploaded_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn current_cv(&self) -> StoreResult<Option<CvFile>> {
        let row = sqlx::query_as::<_, CvFile>(
            "SELECT id, file_name, content_type, data, uploaded_at FROM cv_files \
             ORDER BY uploaded_at DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace_cv(&self, file: NewCvFile) -> StoreResult<CvInfo> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM cv_files").execute(&mut *tx).await?;
        let info = sqlx::query_as::<_, CvInfo>(
            "INSERT INTO cv_files (file_name, content_type, data) VALUES ($1, $2, $3) \
             RETURNING id, file_name, content_type, uploaded_at",
        )
        .bind(&file.file_name)
        .bind(&file.content_type)
        .bind(&file.data)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(info)
    }

    async fn delete_cv(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM cv_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one_deleted(result.rows_affected(), || cv_not_found(id))
    }
}
