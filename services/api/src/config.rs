//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Secrets are never compiled in.

use axum::http::HeaderValue;
use std::net::SocketAddr;
use tracing::Level;

/// Shortest accepted `JWT_SECRET`, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted `TOKEN_TTL_SECS` (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which `UserRepository` implementation backs the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserStore {
    Postgres { database_url: String, max_connections: u32 },
    Memory,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub user_store: UserStore,
    pub log_level: Level,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub cors_allowed_origin: Option<HeaderValue>,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("user_store", &self.user_store.kind())
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .finish()
    }
}

impl UserStore {
    pub fn kind(&self) -> &'static str {
        match self {
            UserStore::Postgres { .. } => "postgres",
            UserStore::Memory => "memory",
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_allowed_origin = match lookup("CORS_ALLOWED_ORIGIN").filter(|s| !s.trim().is_empty()) {
            Some(origin) => Some(HeaderValue::from_str(origin.trim()).map_err(|e| {
                ConfigError::InvalidValue("CORS_ALLOWED_ORIGIN".to_string(), e.to_string())
            })?),
            None => None,
        };

        // --- User Store Settings ---
        let store_kind = lookup("USER_STORE").unwrap_or_else(|| "postgres".to_string());
        let user_store = match store_kind.to_lowercase().as_str() {
            "postgres" => {
                let database_url = lookup("DATABASE_URL")
                    .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
                let max_connections = match lookup("DB_MAX_CONNECTIONS") {
                    Some(raw) => raw.parse::<u32>().map_err(|e| {
                        ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string(), e.to_string())
                    })?,
                    None => 5,
                };
                UserStore::Postgres {
                    database_url,
                    max_connections,
                }
            }
            "memory" => UserStore::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "USER_STORE".to_string(),
                    format!("'{}' is not one of postgres, memory", other),
                ))
            }
        };

        // --- Token Settings ---
        let jwt_secret =
            lookup("JWT_SECRET").ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                format!("must be at least {} bytes", MIN_SECRET_LEN),
            ));
        }

        let token_ttl_secs = match lookup("TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_TOKEN_TTL_SECS).contains(ttl))
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "TOKEN_TTL_SECS".to_string(),
                        format!(
                            "'{}' is not a number of seconds between 1 and {}",
                            raw, MAX_TOKEN_TTL_SECS
                        ),
                    )
                })?,
            None => 3600,
        };

        Ok(Self {
            bind_address,
            user_store,
            log_level,
            jwt_secret,
            token_ttl_secs,
            cors_allowed_origin,
        })
    }
}
