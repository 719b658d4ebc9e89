use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::models::{
    Admin, Article, ArticleInput, ArticleSummary, CvFile, CvInfo, JobHistory, NewCvFile, Project, ProjectInput,
    ValidJobHistory,
};
use super::store::{
    admin_conflict, article_not_found, cv_not_found, job_not_found, project_not_found, slug_conflict,
    PortfolioStore, StoreResult,
};

#[derive(Default)]
struct Tables {
    admins: Vec<Admin>,
    articles: BTreeMap<i32, Article>,
    projects: BTreeMap<i32, Project>,
    jobs: BTreeMap<i32, JobHistory>,
    cv: Option<CvFile>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn slug_taken(&self, slug: &str, except: Option<i32>) -> bool {
        self.articles
            .values()
            .any(|a| a.slug == slug && Some(a.id) != except)
    }
}

/// Process-local store used by tests and when no `DATABASE_URL` is set.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_articles_first(articles: &mut [Article]) {
    articles.sort_by_key(|a| (Reverse(a.created_at), Reverse(a.id)));
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<Admin>> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, email: &str, password_hash: &str) -> StoreResult<Admin> {
        let mut tables = self.tables.write().await;
        if tables.admins.iter().any(|a| a.email == email) {
            return Err(admin_conflict(email));
        }
        let admin = Admin {
            id: tables.next_id(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.admins.push(admin.clone());
        Ok(admin)
    }

    async fn list_published_articles(&self) -> StoreResult<Vec<ArticleSummary>> {
        let tables = self.tables.read().await;
        let mut published: Vec<Article> = tables.articles.values().filter(|a| a.published).cloned().collect();
        newest_articles_first(&mut published);
        Ok(published.iter().map(ArticleSummary::from).collect())
    }

    async fn find_published_article(&self, slug: &str) -> StoreResult<Option<Article>> {
        let tables = self.tables.read().await;
        Ok(tables
            .articles
            .values()
            .find(|a| a.slug == slug && a.published)
            .cloned())
    }

    async fn list_all_articles(&self) -> StoreResult<Vec<Article>> {
        let tables = self.tables.read().await;
        let mut all: Vec<Article> = tables.articles.values().cloned().collect();
        newest_articles_first(&mut all);
        Ok(all)
    }

    async fn create_article(&self, input: &ArticleInput) -> StoreResult<Article> {
        let mut tables = self.tables.write().await;
        if tables.slug_taken(&input.slug, None) {
            return Err(slug_conflict(&input.slug));
        }
        let now = Utc::now();
        let article = Article {
            id: tables.next_id(),
            title: input.title.clone(),
            slug: input.slug.clone(),
            content: input.content.clone(),
            excerpt: input.excerpt.clone(),
            published: input.published,
            created_at: now,
            updated_at: now,
        };
        tables.articles.insert(article.id, article.clone());
        Ok(article)
    }

    async fn update_article(&self, id: i32, input: &ArticleInput) -> StoreResult<Article> {
        let mut tables = self.tables.write().await;
        if !tables.articles.contains_key(&id) {
            return Err(article_not_found(id));
        }
        if tables.slug_taken(&input.slug, Some(id)) {
            return Err(slug_conflict(&input.slug));
        }
        let article = tables.articles.get_mut(&id).ok_or_else(|| article_not_found(id))?;
        article.title = input.title.clone();
        article.slug = input.slug.clone();
        article.content = input.content.clone();
        article.excerpt = input.excerpt.clone();
        article.published = input.published;
        article.updated_at = Utc::now();
        Ok(article.clone())
    }

    async fn delete_article(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.articles.remove(&id).map(|_| ()).ok_or_else(|| article_not_found(id))
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        let mut projects: Vec<Project> = tables.projects.values().cloned().collect();
        projects.sort_by_key(|p| (p.order, Reverse(p.created_at), Reverse(p.id)));
        Ok(projects)
    }

    async fn find_project(&self, id: i32) -> StoreResult<Option<Project>> {
        Ok(self.tables.read().await.projects.get(&id).cloned())
    }

    async fn create_project(&self, input: &ProjectInput) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let project = Project {
            id: tables.next_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            tech_stack: input.tech_stack.clone(),
            live_url: input.live_url.clone(),
            github_url: input.github_url.clone(),
            image_url: input.image_url.clone(),
            order: input.order,
            created_at: Utc::now(),
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: i32, input: &ProjectInput) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;
        let project = tables.projects.get_mut(&id).ok_or_else(|| project_not_found(id))?;
        project.title = input.title.clone();
        project.description = input.description.clone();
        project.tech_stack = input.tech_stack.clone();
        project.live_url = input.live_url.clone();
        project.github_url = input.github_url.clone();
        project.image_url = input.image_url.clone();
        project.order = input.order;
        Ok(project.clone())
    }

    async fn delete_project(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.projects.remove(&id).map(|_| ()).ok_or_else(|| project_not_found(id))
    }

    async fn list_jobs(&self) -> StoreResult<Vec<JobHistory>> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<JobHistory> = tables.jobs.values().cloned().collect();
        jobs.sort_by_key(|j| (j.order, Reverse(j.start_date), Reverse(j.id)));
        Ok(jobs)
    }

    async fn find_job(&self, id: i32) -> StoreResult<Option<JobHistory>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn create_job(&self, input: &ValidJobHistory) -> StoreResult<JobHistory> {
        let mut tables = self.tables.write().await;
        let job = JobHistory {
            id: tables.next_id(),
            company: input.company.clone(),
            role: input.role.clone(),
            description: input.description.clone(),
            start_date: input.start_date,
            end_date: input.end_date,
            is_current_role: input.is_current_role,
            order: input.order,
        };
        tables.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn update_job(&self, id: i32, input: &ValidJobHistory) -> StoreResult<JobHistory> {
        let mut tables = self.tables.write().await;
        let job = tables.jobs.get_mut(&id).ok_or_else(|| job_not_found(id))?;
        job.company = input.company.clone();
        job.role = input.role.clone();
        job.description = input.description.clone();
        job.start_date = input.start_date;
        job.end_date = input.end_date;
        job.is_current_role = input.is_current_role;
        job.order = input.order;
        Ok(job.clone())
    }

    async fn delete_job(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.jobs.remove(&id).map(|_| ()).ok_or_else(|| job_not_found(id))
    }

    async fn current_cv_info(&self) -> StoreResult<Option<CvInfo>> {
        Ok(self.tables.read().await.cv.as_ref().map(CvInfo::from))
    }

    async fn current_cv(&self) -> StoreResult<Option<CvFile>> {
        Ok(self.tables.read().await.cv.clone())
    }

    async fn replace_cv(&self, file: NewCvFile) -> StoreResult<CvInfo> {
        let mut tables = self.tables.write().await;
        let cv = CvFile {
            id: tables.next_id(),
            file_name: file.file_name,
            content_type: file.content_type,
            data: file.data,
            uploaded_at: Utc::now(),
        };
        let info = CvInfo::from(&cv);
        tables.cv = Some(cv);
        Ok(info)
    }

    async fn delete_cv(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match &tables.cv {
            Some(cv) if cv.id == id => {
                tables.cv = None;
                Ok(())
            }
            _ => Err(cv_not_found(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::StoreError;

    fn article(slug: &str, published: bool) -> ArticleInput {
        ArticleInput {
            title: format!("Title {}", slug),
            slug: slug.to_string(),
            content: "Body".to_string(),
            excerpt: None,
            published,
        }
    }

    #[tokio::test]
    async fn admin_email_is_unique() {
        let store = MemoryStore::new();
        store.insert_admin("admin@example.com", "hash").await.unwrap();
        let err = store.insert_admin("admin@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Case-sensitive identity
        assert!(store.find_admin_by_email("Admin@example.com").await.unwrap().is_none());
        assert!(store.find_admin_by_email("admin@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn drafts_stay_out_of_public_listing() {
        let store = MemoryStore::new();
        store.create_article(&article("draft", false)).await.unwrap();
        store.create_article(&article("first", true)).await.unwrap();
        store.create_article(&article("second", true)).await.unwrap();

        let public = store.list_published_articles().await.unwrap();
        let slugs: Vec<&str> = public.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);

        assert!(store.find_published_article("draft").await.unwrap().is_none());
        assert_eq!(store.list_all_articles().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn slug_clash_is_a_conflict() {
        let store = MemoryStore::new();
        let a = store.create_article(&article("one", true)).await.unwrap();
        store.create_article(&article("two", true)).await.unwrap();

        assert!(matches!(
            store.create_article(&article("one", false)).await,
            Err(StoreError::Conflict(_))
        ));
        assert!(matches!(
            store.update_article(a.id, &article("two", true)).await,
            Err(StoreError::Conflict(_))
        ));
        // Keeping its own slug is fine.
        let updated = store.update_article(a.id, &article("one", false)).await.unwrap();
        assert!(!updated.published);
        assert!(updated.updated_at >= a.updated_at);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.delete_article(42).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_project(42).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_job(42).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_cv(42).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn projects_sort_by_order_then_newest() {
        let store = MemoryStore::new();
        for (title, order) in [("b", 1), ("a", 0), ("c", 1)] {
            store
                .create_project(&ProjectInput {
                    title: title.into(),
                    description: "d".into(),
                    order,
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        let titles: Vec<String> = store.list_projects().await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["a", "c", "b"]);
    }

    #[tokio::test]
    async fn cv_upload_replaces_previous() {
        let store = MemoryStore::new();
        let first = store
            .replace_cv(NewCvFile {
                file_name: "old.pdf".into(),
                content_type: "application/pdf".into(),
                data: vec![1, 2, 3],
            })
            .await
            .unwrap();
        let second = store
            .replace_cv(NewCvFile {
                file_name: "new.pdf".into(),
                content_type: "application/pdf".into(),
                data: vec![4, 5],
            })
            .await
            .unwrap();

        let current = store.current_cv().await.unwrap().unwrap();
        assert_eq!(current.file_name, "new.pdf");
        assert_eq!(current.data, vec![4, 5]);
        assert!(matches!(store.delete_cv(first.id).await, Err(StoreError::NotFound(_))));
        store.delete_cv(second.id).await.unwrap();
        assert!(store.current_cv_info().await.unwrap().is_none());
    }
}
