pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{PortfolioStore, StoreError, StoreResult};

use std::sync::Arc;
use tracing::warn;

use crate::config::DatabaseConfig;

/// PostgreSQL when a URL is configured, otherwise a process-local store.
pub async fn open_store(config: &DatabaseConfig) -> StoreResult<Arc<dyn PortfolioStore>> {
    match config.url.as_deref() {
        Some(url) => {
            let store = PgStore::connect(url, config).await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
