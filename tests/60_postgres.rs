//! PostgreSQL store tests. They need a reachable database in `DATABASE_URL`
//! and return early without one.

use anyhow::Result;
use uuid::Uuid;

use portfolio_api::config::AppConfig;
use portfolio_api::database::models::{ArticleInput, NewCvFile, ProjectInput};
use portfolio_api::database::{PgStore, PortfolioStore, StoreError};

async fn postgres_store() -> Result<Option<PgStore>> {
    dotenvy::dotenv().ok();
    let config = AppConfig::load_env();
    let Some(url) = config.database.url.clone() else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL store test");
        return Ok(None);
    };
    Ok(Some(PgStore::connect(&url, &config.database).await?))
}

/// Suffix keeping rows from concurrent or repeated runs apart.
fn unique() -> String {
    Uuid::new_v4().simple().to_string()
}

fn article(slug: &str) -> ArticleInput {
    ArticleInput {
        title: "Stored".to_string(),
        slug: slug.to_string(),
        content: "Body".to_string(),
        excerpt: None,
        published: true,
    }
}

#[tokio::test]
async fn duplicate_slug_is_a_conflict() -> Result<()> {
    let Some(store) = postgres_store().await? else { return Ok(()) };
    let slug = format!("pg-{}", unique());

    let created = store.create_article(&article(&slug)).await?;
    let err = store.create_article(&article(&slug)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(ref msg) if msg.contains(&slug)), "got {:?}", err);

    // Renaming another article onto a taken slug conflicts too
    let other = store.create_article(&article(&format!("pg-{}", unique()))).await?;
    let err = store.update_article(other.id, &article(&slug)).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {:?}", err);

    store.delete_article(created.id).await?;
    store.delete_article(other.id).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_admin_is_a_conflict() -> Result<()> {
    let Some(store) = postgres_store().await? else { return Ok(()) };
    let email = format!("{}@example.com", unique());

    store.insert_admin(&email, "$argon2id$placeholder").await?;
    let err = store.insert_admin(&email, "$argon2id$other").await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn missing_ids_are_not_found() -> Result<()> {
    let Some(store) = postgres_store().await? else { return Ok(()) };

    assert!(matches!(store.delete_article(i32::MAX).await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete_project(i32::MAX).await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete_job(i32::MAX).await, Err(StoreError::NotFound(_))));
    assert!(matches!(store.delete_cv(i32::MAX).await, Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.update_article(i32::MAX, &article(&format!("pg-{}", unique()))).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(store.find_project(i32::MAX).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn projects_are_listed_by_display_order() -> Result<()> {
    let Some(store) = postgres_store().await? else { return Ok(()) };
    let tag = unique();

    let project = |title: &str, order: i32| ProjectInput {
        title: format!("{}-{}", title, tag),
        description: "d".to_string(),
        order,
        ..Default::default()
    };
    let later = store.create_project(&project("later", 2)).await?;
    let first = store.create_project(&project("first", 1)).await?;

    let ours: Vec<i32> = store
        .list_projects()
        .await?
        .into_iter()
        .filter(|p| p.title.ends_with(&tag))
        .map(|p| p.id)
        .collect();
    assert_eq!(ours, vec![first.id, later.id]);

    store.delete_project(first.id).await?;
    store.delete_project(later.id).await?;
    Ok(())
}

#[tokio::test]
async fn replace_cv_keeps_a_single_row() -> Result<()> {
    let Some(store) = postgres_store().await? else { return Ok(()) };

    let upload = |name: &str| NewCvFile {
        file_name: name.to_string(),
        content_type: "application/pdf".to_string(),
        data: format!("%PDF-1.4 {}", name).into_bytes(),
    };
    let old = store.replace_cv(upload("old.pdf")).await?;
    let new = store.replace_cv(upload("new.pdf")).await?;

    // The earlier upload is gone
    assert!(matches!(store.delete_cv(old.id).await, Err(StoreError::NotFound(_))));

    let current = store.current_cv().await?.expect("current CV");
    assert_eq!(current.id, new.id);
    assert_eq!(current.data, b"%PDF-1.4 new.pdf".to_vec());

    // Deleting the only row leaves none behind
    store.delete_cv(new.id).await?;
    assert!(store.current_cv_info().await?.is_none());
    Ok(())
}
