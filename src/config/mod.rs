use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Minimum HMAC-SHA256 key length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest session lifetime accepted, one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("JWT_SECRET_KEY must be at least {MIN_SECRET_LEN} bytes (got {0})")]
    SecretTooShort(usize),

    #[error("JWT_EXPIRY_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES} (got {0})")]
    InvalidTokenTtl(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub rate_limits: RateLimitConfig,
    pub password: PasswordConfig,
    pub admin: AdminSeedConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Maps an `APP_ENV` value to an environment; unset or unknown values select production.
    pub fn from_app_env(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("development") | Some("dev") => Environment::Development,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret_key: String,
    pub issuer: String,
    pub audience: String,
    pub expiry_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret_key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_minutes", &self.expiry_minutes)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
}

/// Permit count and window for one named fixed-window limiter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimiterPolicy {
    pub permits: u32,
    pub window_secs: u64,
}

impl LimiterPolicy {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub public: LimiterPolicy,
    pub login: LimiterPolicy,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for AdminSeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeedConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AppConfig {
    /// Loads and validates the configuration the server runs with.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::load_env();
        config.validate()?;
        Ok(config)
    }

    /// Loads without validation, for commands that never touch tokens.
    pub fn load_env() -> Self {
        let app_env = env::var("APP_ENV").ok();
        let environment = Environment::from_app_env(app_env.as_deref());
        if app_env.is_none() {
            tracing::warn!("APP_ENV is not set; using production defaults");
        }

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    /// Rejects configurations the token service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret_key.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET_KEY"));
        }
        if self.jwt.secret_key.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort(self.jwt.secret_key.len()));
        }
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&self.jwt.expiry_minutes) {
            return Err(ConfigError::InvalidTokenTtl(self.jwt.expiry_minutes));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("PORTFOLIO_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // JWT overrides
        if let Ok(v) = env::var("JWT_SECRET_KEY") {
            self.jwt.secret_key = v;
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.jwt.issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.jwt.audience = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_MINUTES") {
            self.jwt.expiry_minutes = v.parse().unwrap_or(self.jwt.expiry_minutes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = parse_origins(&v);
        }

        // Rate limit overrides
        if let Ok(v) = env::var("RATE_LIMIT_PUBLIC_PERMITS") {
            self.rate_limits.public.permits = v.parse().unwrap_or(self.rate_limits.public.permits);
        }
        if let Ok(v) = env::var("RATE_LIMIT_PUBLIC_WINDOW_SECS") {
            self.rate_limits.public.window_secs = v.parse().unwrap_or(self.rate_limits.public.window_secs);
        }
        if let Ok(v) = env::var("RATE_LIMIT_LOGIN_PERMITS") {
            self.rate_limits.login.permits = v.parse().unwrap_or(self.rate_limits.login.permits);
        }
        if let Ok(v) = env::var("RATE_LIMIT_LOGIN_WINDOW_SECS") {
            self.rate_limits.login.window_secs = v.parse().unwrap_or(self.rate_limits.login.window_secs);
        }

        // Password hashing overrides
        if let Ok(v) = env::var("PASSWORD_HASH_MEMORY_KIB") {
            self.password.memory_kib = v.parse().unwrap_or(self.password.memory_kib);
        }
        if let Ok(v) = env::var("PASSWORD_HASH_ITERATIONS") {
            self.password.iterations = v.parse().unwrap_or(self.password.iterations);
        }
        if let Ok(v) = env::var("PASSWORD_HASH_PARALLELISM") {
            self.password.parallelism = v.parse().unwrap_or(self.password.parallelism);
        }

        // Admin seed overrides
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.admin.email = v;
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = Some(v).filter(|s| !s.is_empty());
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB, the CV upload limit
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 5,
                connection_timeout: 30,
            },
            jwt: JwtConfig {
                secret_key: String::new(),
                issuer: "portfolio-api".to_string(),
                audience: "portfolio-frontend".to_string(),
                expiry_minutes: 1440,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:5173".to_string(), "http://localhost:3000".to_string()],
            },
            rate_limits: RateLimitConfig {
                public: LimiterPolicy { permits: 60, window_secs: 60 },
                login: LimiterPolicy { permits: 10, window_secs: 60 },
            },
            password: PasswordConfig {
                memory_kib: 19 * 1024,
                iterations: 2,
                parallelism: 1,
            },
            admin: AdminSeedConfig {
                email: "admin@example.com".to_string(),
                password: None,
            },
        }
    }

    pub fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.host = "0.0.0.0".to_string();
        config.database.max_connections = 10;
        config.database.connection_timeout = 10;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.host = "0.0.0.0".to_string();
        config.database.max_connections = 20;
        config.database.connection_timeout = 5;
        config.security.cors_origins = vec!["https://example.com".to_string()];
        config.password.memory_kib = 64 * 1024;
        config.password.iterations = 3;
        config
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(config.is_development());
        assert_eq!(config.jwt.expiry_minutes, 1440);
        assert_eq!(config.rate_limits.public.permits, 60);
        assert_eq!(config.rate_limits.login.permits, 10);
        assert_eq!(config.rate_limits.login.window(), Duration::from_secs(60));
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.is_development());
        assert_eq!(config.environment, Environment::Production);
        assert!(config.password.memory_kib > AppConfig::development().password.memory_kib);
    }

    #[test]
    fn unset_app_env_selects_production() {
        assert_eq!(Environment::from_app_env(None), Environment::Production);
        assert_eq!(Environment::from_app_env(Some("")), Environment::Production);
        assert_eq!(Environment::from_app_env(Some("typo")), Environment::Production);
        assert_eq!(Environment::from_app_env(Some("production")), Environment::Production);
        assert_eq!(Environment::from_app_env(Some("staging")), Environment::Staging);
        assert_eq!(Environment::from_app_env(Some("development")), Environment::Development);
        assert_eq!(Environment::from_app_env(Some("dev")), Environment::Development);
    }

    #[test]
    fn rejects_missing_and_short_secrets() {
        let mut config = AppConfig::development();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("JWT_SECRET_KEY"))));

        config.jwt.secret_key = "too-short".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::SecretTooShort(9))));

        config.jwt.secret_key = "x".repeat(MIN_SECRET_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_token_ttl_out_of_range() {
        let mut config = AppConfig::development();
        config.jwt.secret_key = "x".repeat(MIN_SECRET_LEN);

        for ttl in [0, -5, MAX_TOKEN_TTL_MINUTES + 1, 1_000_000_000_000] {
            config.jwt.expiry_minutes = ttl;
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidTokenTtl(got)) if got == ttl),
                "ttl {} should be rejected",
                ttl
            );
        }

        for ttl in [1, 1440, MAX_TOKEN_TTL_MINUTES] {
            config.jwt.expiry_minutes = ttl;
            assert!(config.validate().is_ok(), "ttl {} should be accepted", ttl);
        }
    }

    #[test]
    fn parses_origin_lists() {
        let origins = parse_origins(" https://a.example.com/, https://b.example.com ,,");
        assert_eq!(origins, vec!["https://a.example.com", "https://b.example.com"]);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let mut config = AppConfig::development();
        config.jwt.secret_key = "super-secret-signing-key-material-0123".to_string();
        config.admin.password = Some("hunter2".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("hunter2"));
    }
}
