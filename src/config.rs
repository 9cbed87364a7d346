use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

/// Where admin sessions live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Database,
}

impl SessionBackend {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Self::Memory,
            _ => Self::Database,
        }
    }
}

const LOCAL_SESSION_SECRET: &str = "geo5lux_secret";

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_seconds: u64,
    pub run_migrations: bool,

    // API settings
    pub api_host: String,
    pub api_port: u16,
    pub cors_origins: Vec<String>,

    // Sessions
    pub session_secret: String,
    pub session_backend: SessionBackend,
    pub session_ttl_seconds: u64,
    pub session_cookie_secure: bool,

    // Rate limiting
    pub disable_rate_limiting: bool,
    pub rate_limit_login_per_second: u64,
    pub rate_limit_login_burst: u32,

    // Application metadata
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let deployment =
            Deployment::from_str(&env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()));

        // The built-in secret is only acceptable on a developer machine
        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if deployment == Deployment::Local => LOCAL_SESSION_SECRET.to_string(),
            _ => return Err(ConfigError::Missing("SESSION_SECRET")),
        };

        Ok(Self {
            // Database
            database_url: database_url_from_env()?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            db_acquire_timeout_seconds: env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            run_migrations: env::var("RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),

            // API settings
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("PORT")
                .or_else(|_| env::var("API_PORT"))
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            cors_origins: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),

            // Sessions
            session_secret,
            session_backend: SessionBackend::from_str(
                &env::var("SESSION_STORE").unwrap_or_else(|_| "database".to_string()),
            ),
            session_ttl_seconds: env::var("SESSION_TTL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86_400), // 24 hours
            session_cookie_secure: env::var("SESSION_COOKIE_SECURE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),

            // Rate limiting
            disable_rate_limiting: env::var("DISABLE_RATE_LIMITING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            rate_limit_login_per_second: env::var("RATE_LIMIT_LOGIN_PER_SECOND")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            rate_limit_login_burst: env::var("RATE_LIMIT_LOGIN_BURST")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            deployment,
        })
    }

    /// Defaults for a single local instance: in-memory sessions and no rate
    /// limiting. Used by tests and embedders.
    #[must_use]
    pub fn local(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: 10,
            db_acquire_timeout_seconds: 5,
            run_migrations: true,
            api_host: "127.0.0.1".to_string(),
            api_port: 8080,
            cors_origins: vec!["http://localhost:3000".to_string()],
            session_secret: LOCAL_SESSION_SECRET.to_string(),
            session_backend: SessionBackend::Memory,
            session_ttl_seconds: 86_400,
            session_cookie_secure: false,
            disable_rate_limiting: true,
            rate_limit_login_per_second: 1,
            rate_limit_login_burst: 10,
            deployment: Deployment::Local,
        }
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

/// `DATABASE_URL` wins; otherwise a Postgres URL is assembled from the
/// individual `DB_*` credentials.
fn database_url_from_env() -> Result<String, ConfigError> {
    if let Ok(url) = env::var("DATABASE_URL") {
        return Ok(url);
    }

    let host = env::var("DB_HOST").map_err(|_| ConfigError::Missing("DATABASE_URL or DB_HOST"))?;
    let user = env::var("DB_USER").map_err(|_| ConfigError::Missing("DB_USER"))?;
    let password = env::var("DB_PASSWORD").unwrap_or_default();
    let name = env::var("DB_NAME").map_err(|_| ConfigError::Missing("DB_NAME"))?;
    let port = env::var("DB_PORT").unwrap_or_else(|_| "5432".to_string());

    Ok(compose_database_url(&host, &port, &user, &password, &name))
}

fn compose_database_url(host: &str, port: &str, user: &str, password: &str, name: &str) -> String {
    if password.is_empty() {
        format!("postgres://{user}@{host}:{port}/{name}")
    } else {
        format!("postgres://{user}:{password}@{host}:{port}/{name}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
