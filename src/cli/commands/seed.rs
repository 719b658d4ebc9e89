use anyhow::Context;
use serde_json::json;
use std::sync::Arc;

use crate::auth::PasswordHasher;
use crate::cli::{utils, OutputFormat};
use crate::config::{AdminSeedConfig, AppConfig};
use crate::database::{open_store, PortfolioStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created { email: String },
    AlreadyExists { email: String },
}

/// Creates the admin credential unless one with the same email exists.
pub async fn seed_admin(
    store: &dyn PortfolioStore,
    hasher: Arc<PasswordHasher>,
    admin: &AdminSeedConfig,
) -> anyhow::Result<SeedOutcome> {
    let email = admin.email.trim().to_string();
    if email.is_empty() {
        anyhow::bail!("ADMIN_EMAIL must not be empty");
    }

    if store.find_admin_by_email(&email).await?.is_some() {
        return Ok(SeedOutcome::AlreadyExists { email });
    }

    let password = admin
        .password
        .clone()
        .context("ADMIN_PASSWORD must be set to seed the admin")?;
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    store.insert_admin(&email, &hash).await?;
    tracing::info!(email = %email, "admin seeded");
    Ok(SeedOutcome::Created { email })
}

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::load_env();
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set; the in-memory store does not outlive this command");
    }

    let store = open_store(&config.database).await.context("failed to open the database")?;
    let hasher = Arc::new(PasswordHasher::new(&config.password).context("invalid password hashing parameters")?);

    match seed_admin(store.as_ref(), hasher, &config.admin).await? {
        SeedOutcome::Created { email } => utils::output_success(
            output_format,
            &format!("Admin {} created", email),
            Some(json!({ "email": email })),
        ),
        SeedOutcome::AlreadyExists { email } => {
            utils::output_skipped(output_format, &format!("Admin {} already exists, nothing to do", email))
        }
    }
}
