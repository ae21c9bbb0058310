//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod chirp;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::auth::AuthConfig;
use self::chirp::ChirpConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Environment variables of earlier deployments, mapped to config keys.
///
/// They are registered as defaults, so TOML files and `CHIRPY__*`
/// variables still win.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("database.url", "DB_URL"),
    ("auth.jwt_secret", "AUTH_SECRET"),
    ("auth.polka_key", "POLKA_KEY"),
];

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Chirp content settings.
    #[serde(default)]
    pub chirps: ChirpConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges the file at `path`, an environment-specific overlay
    /// (`config/{CHIRPY_ENV}`), and environment variables prefixed with
    /// `CHIRPY__`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("CHIRPY_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("CHIRPY")
                    .separator("__")
                    .try_parsing(true),
            );

        for (key, var) in LEGACY_ENV {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_default(*key, value)?;
            }
        }

        let config: Self = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Configuration for `database_url` and `auth`, with every other
    /// section at its defaults.
    pub fn new(database_url: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            database: DatabaseConfig::new(database_url),
            auth,
            chirps: ChirpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Rejects configurations the auth subsystem cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        if self.chirps.max_length == 0 {
            return Err(AppError::configuration(
                "chirps.max_length must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Pool settings for `url` with default sizes and timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}
