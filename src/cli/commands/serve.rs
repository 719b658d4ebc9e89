use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::seed::{seed_admin, SeedOutcome};
use crate::app::app;
use crate::config::AppConfig;
use crate::database::open_store;
use crate::state::AppState;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = port {
        config.server.port = port;
    }
    info!("Starting Portfolio API in {:?} mode", config.environment);

    let store = open_store(&config.database).await.context("failed to open the store")?;
    let state = AppState::new(config, store).context("invalid password hashing parameters")?;

    // A process-local store starts empty; seed it so the admin can sign in.
    if state.config.database.url.is_none() {
        if state.config.admin.password.is_some() {
            if let SeedOutcome::Created { email } =
                seed_admin(state.store.as_ref(), state.passwords.clone(), &state.config.admin).await?
            {
                info!(email = %email, "seeded in-memory admin");
            }
        } else {
            warn!("ADMIN_PASSWORD not set; nobody can sign in to the in-memory store");
        }
    }

    let bind_addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Portfolio API listening on http://{}", bind_addr);

    axum::serve(listener, app(state).into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Portfolio API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
