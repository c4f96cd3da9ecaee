//! Configuration management for the recipes server.
//!
//! Loaded from environment variables, with an optional `.env` file for local
//! development.

use std::env;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SERVICE_NAME: &str = "recipes-server";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when STORAGE_BACKEND=postgres")]
    MissingDatabaseUrl,

    #[error("Invalid PORT {0:?}: expected a number between 1 and 65535")]
    InvalidPort(String),

    #[error("Unknown STORAGE_BACKEND {0:?}: expected \"postgres\" or \"memory\"")]
    UnknownBackend(String),
}

/// Where recipes are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    /// Required for [`StorageBackend::Postgres`].
    pub database_url: Option<String>,
    /// Add the `X-DB-Query-Count` header to every response.
    pub track_query_count: bool,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        let storage = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Postgres,
        };

        let database_url = var("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Config {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            storage,
            database_url,
            track_query_count: var("TRACK_DB_QUERY_COUNT").is_some_and(|v| v == "1"),
            otlp_endpoint: var("OTEL_EXPORTER_OTLP_ENDPOINT"),
            service_name: var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_with_database_url() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/recipes")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/recipes")
        );
        assert!(!config.track_query_count);
        assert!(config.otlp_endpoint.is_none());
        assert_eq!(config.service_name, "recipes-server");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_postgres_requires_database_url() {
        assert_eq!(config_from(&[]), Err(ConfigError::MissingDatabaseUrl));
        assert_eq!(
            config_from(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::MissingDatabaseUrl)
        );
    }

    #[test]
    fn test_memory_backend_needs_no_database() {
        let config = config_from(&[("STORAGE_BACKEND", "Memory")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_unknown_backend() {
        assert_eq!(
            config_from(&[("STORAGE_BACKEND", "mysql")]),
            Err(ConfigError::UnknownBackend("mysql".to_string()))
        );
    }

    #[test]
    fn test_invalid_port() {
        for port in ["0", "70000", "http"] {
            assert_eq!(
                config_from(&[("STORAGE_BACKEND", "memory"), ("PORT", port)]),
                Err(ConfigError::InvalidPort(port.to_string()))
            );
        }
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STORAGE_BACKEND", "memory"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("TRACK_DB_QUERY_COUNT", "1"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317"),
            ("OTEL_SERVICE_NAME", "recipes-staging"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert!(config.track_query_count);
        assert_eq!(
            config.otlp_endpoint.as_deref(),
            Some("http://localhost:4317")
        );
        assert_eq!(config.service_name, "recipes-staging");
    }
}
