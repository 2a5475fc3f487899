//! Environment-driven configuration for the store and the loaders

use std::env;
use std::time::Duration;

use crate::backends::DatabaseBackendType;

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required field: {field}. {hint}")]
    MissingRequired { field: String, hint: String },

    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

/// Store and loading configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout: u64,
    pub statement_timeout_ms: u64,
    pub batch_size: i64,
    pub statistics_enabled: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout: 30,
            statement_timeout_ms: 5_000,
            batch_size: 10,
            statistics_enabled: true,
        }
    }
}

impl FetchConfig {
    /// Configuration for an isolated in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::default().normalized()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }

        if let Ok(value) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = value.parse().map_err(|_| ConfigError::InvalidValue {
                field: "max_connections".to_string(),
                value,
                expected: "positive integer".to_string(),
            })?;
        }

        if let Ok(value) = env::var("DATABASE_ACQUIRE_TIMEOUT") {
            config.acquire_timeout = value.parse().map_err(|_| ConfigError::InvalidValue {
                field: "acquire_timeout".to_string(),
                value,
                expected: "number of seconds".to_string(),
            })?;
        }

        if let Ok(value) = env::var("STATEMENT_TIMEOUT_MS") {
            config.statement_timeout_ms = value.parse().map_err(|_| ConfigError::InvalidValue {
                field: "statement_timeout_ms".to_string(),
                value,
                expected: "number of milliseconds".to_string(),
            })?;
        }

        if let Ok(value) = env::var("FETCH_BATCH_SIZE") {
            config.batch_size = value.parse().map_err(|_| ConfigError::InvalidValue {
                field: "batch_size".to_string(),
                value,
                expected: "integer greater than zero".to_string(),
            })?;
        }

        if let Ok(value) = env::var("STATEMENT_STATISTICS") {
            config.statistics_enabled = value.parse().map_err(|_| ConfigError::InvalidValue {
                field: "statistics_enabled".to_string(),
                value,
                expected: "true or false".to_string(),
            })?;
        }

        config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "database_url".to_string(),
                hint: "set DATABASE_URL, e.g. sqlite::memory: or postgres://...".to_string(),
            });
        }

        self.database_url
            .parse::<DatabaseBackendType>()
            .map_err(|_| ConfigError::InvalidValue {
                field: "database_url".to_string(),
                value: self.database_url.clone(),
                expected: "a postgres:// or sqlite: URL".to_string(),
            })?;

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_connections".to_string(),
                value: "0".to_string(),
                expected: "at least 1".to_string(),
            });
        }

        if self.batch_size <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size".to_string(),
                value: self.batch_size.to_string(),
                expected: "integer greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Whether the URL points at a private in-memory SQLite database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.starts_with("sqlite::memory:") || self.database_url.contains("mode=memory")
    }

    /// Every in-memory SQLite connection is its own database, so the pool
    /// must hold exactly one.
    pub fn normalized(mut self) -> Self {
        if self.is_in_memory() {
            self.max_connections = 1;
        }
        self
    }

    pub fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "DATABASE_URL",
            "DATABASE_MAX_CONNECTIONS",
            "DATABASE_ACQUIRE_TIMEOUT",
            "STATEMENT_TIMEOUT_MS",
            "FETCH_BATCH_SIZE",
            "STATEMENT_STATISTICS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_from_empty_env() {
        clear_env();
        let config = FetchConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.batch_size, 10);
        assert!(config.statistics_enabled);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("DATABASE_URL", "postgres://localhost/fetchlab");
        env::set_var("DATABASE_MAX_CONNECTIONS", "8");
        env::set_var("FETCH_BATCH_SIZE", "25");
        env::set_var("STATEMENT_STATISTICS", "false");

        let config = FetchConfig::from_env().unwrap();
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.batch_size, 25);
        assert!(!config.statistics_enabled);
        assert!(!config.is_in_memory());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_non_positive_batch_size() {
        clear_env();
        env::set_var("FETCH_BATCH_SIZE", "0");
        assert!(matches!(
            FetchConfig::from_env(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "batch_size"
        ));

        env::set_var("FETCH_BATCH_SIZE", "-3");
        assert!(FetchConfig::from_env().is_err());

        env::set_var("FETCH_BATCH_SIZE", "ten");
        assert!(FetchConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let config = FetchConfig {
            database_url: "mysql://localhost/db".to_string(),
            ..FetchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
