use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unsupported database dialect: {0}")]
    UnsupportedDialect(String),
}

/// Relational engine behind the cupcake store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDialect {
    Sqlite,
    Postgres,
}

impl FromStr for DbDialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(DbDialect::Sqlite),
            "postgres" => Ok(DbDialect::Postgres),
            other => Err(ConfigError::UnsupportedDialect(other.to_string())),
        }
    }
}

impl fmt::Display for DbDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbDialect::Sqlite => write!(f, "sqlite"),
            DbDialect::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub db_dialect: String,
    pub db_dsn: String,
    pub db_max_connections: u32,
    pub log_level: String,
    pub web_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            db_dialect: "sqlite".to_string(),
            db_dsn: "cupcake_store.db".to_string(),
            db_max_connections: 20,
            log_level: "info".to_string(),
            web_dir: "web".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the
    /// process environment (`PORT`, `DB_DIALECT`, `DB_DSN`, `LOG_LEVEL`, ...)
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(config::Environment::default())
    }

    /// Same layering as [`AppConfig::load`] with an explicit environment source
    pub fn load_from(environment: config::Environment) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Unset and empty variables both fall back to the defaults
        config = config.add_source(environment.ignore_empty(true));

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    pub fn dialect(&self) -> Result<DbDialect, ConfigError> {
        self.db_dialect.parse()
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
