use std::sync::Arc;

use crate::auth::{PasswordError, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::PortfolioStore;
use crate::middleware::FixedWindowLimiter;

/// Named limiters applied as route layers.
#[derive(Clone)]
pub struct Limiters {
    pub public: Arc<FixedWindowLimiter>,
    pub login: Arc<FixedWindowLimiter>,
}

/// Everything a handler may touch, shared read-only across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordHasher>,
    pub store: Arc<dyn PortfolioStore>,
    pub limiters: Limiters,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PortfolioStore>) -> Result<Self, PasswordError> {
        let tokens = TokenService::new(&config.jwt);
        let passwords = PasswordHasher::new(&config.password)?;
        let limiters = Limiters {
            public: Arc::new(FixedWindowLimiter::new("public", config.rate_limits.public)),
            login: Arc::new(FixedWindowLimiter::new("login", config.rate_limits.login)),
        };

        Ok(Self {
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            passwords: Arc::new(passwords),
            store,
            limiters,
        })
    }
}
