use anyhow::Context;

use crate::auth::PasswordHasher;
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;

pub async fn handle(password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let config = AppConfig::load_env();
    let hasher = PasswordHasher::new(&config.password).context("invalid password hashing parameters")?;
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    utils::output_value(output_format, "hash", &hash)
}
