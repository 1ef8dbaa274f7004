//! Configuration structures
//!
//! Loaded by the infrastructure crate from environment variables or a config
//! file; see `alarmdesk-infra::config::loader`.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Connection pool size
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter level (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_pool_size() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "alarmdesk.db".to_string(), pool_size: default_pool_size() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_sections() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_database_section_uses_field_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"database": {"path": "/tmp/test.db"}}"#).unwrap();
        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.database.pool_size, 5);
    }
}
