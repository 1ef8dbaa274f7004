//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ALARMDESK_DB_PATH`: Database file path
//! - `ALARMDESK_DB_POOL_SIZE`: Connection pool size (optional, default 5)
//! - `ALARMDESK_LOG_LEVEL`: Log filter level (optional, default `info`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./alarmdesk.json` or `./alarmdesk.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use alarmdesk_domain::{AlarmDeskError, Config, DatabaseConfig, LoggingConfig, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `AlarmDeskError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    // Try loading from environment first
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            // Fall back to file
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `ALARMDESK_DB_PATH` must be present; pool size and log level fall back
/// to their defaults when unset.
///
/// # Errors
/// Returns `AlarmDeskError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("ALARMDESK_DB_PATH")?;

    let db_pool_size = match std::env::var("ALARMDESK_DB_POOL_SIZE") {
        Ok(s) => s
            .parse::<u32>()
            .map_err(|e| AlarmDeskError::Config(format!("Invalid pool size: {}", e)))?,
        Err(_) => DatabaseConfig::default().pool_size,
    };

    let log_level =
        std::env::var("ALARMDESK_LOG_LEVEL").unwrap_or_else(|_| LoggingConfig::default().level);

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        logging: LoggingConfig { level: log_level },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `AlarmDeskError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AlarmDeskError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AlarmDeskError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AlarmDeskError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `AlarmDeskError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AlarmDeskError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AlarmDeskError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AlarmDeskError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./alarmdesk.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("alarmdesk.json"),
            cwd.join("alarmdesk.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("alarmdesk.json"),
                exe_dir.join("alarmdesk.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `AlarmDeskError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AlarmDeskError::Config(format!("Missing required environment variable: {}", key))
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use tempfile::NamedTempFile;

    use super::*;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn env_loading_requires_db_path() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::remove_var("ALARMDESK_DB_PATH");
        std::env::remove_var("ALARMDESK_DB_POOL_SIZE");

        let result = load_from_env();
        assert!(matches!(result, Err(AlarmDeskError::Config(_))));
    }

    #[test]
    fn env_loading_applies_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::set_var("ALARMDESK_DB_PATH", "/tmp/alarmdesk-test.db");
        std::env::remove_var("ALARMDESK_DB_POOL_SIZE");
        std::env::remove_var("ALARMDESK_LOG_LEVEL");

        let config = load_from_env().expect("config loads");
        assert_eq!(config.database.path, "/tmp/alarmdesk-test.db");
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.logging.level, "info");

        std::env::remove_var("ALARMDESK_DB_PATH");
    }

    #[test]
    fn invalid_pool_size_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        std::env::set_var("ALARMDESK_DB_PATH", "/tmp/alarmdesk-test.db");
        std::env::set_var("ALARMDESK_DB_POOL_SIZE", "lots");

        let result = load_from_env();
        assert!(matches!(result, Err(AlarmDeskError::Config(_))));

        std::env::remove_var("ALARMDESK_DB_PATH");
        std::env::remove_var("ALARMDESK_DB_POOL_SIZE");
    }

    #[test]
    fn toml_file_round_trips() {
        let mut file = NamedTempFile::with_suffix(".toml").expect("temp file");
        writeln!(
            file,
            "[database]\npath = \"/tmp/from-file.db\"\npool_size = 8\n\n[logging]\nlevel = \"debug\"\n"
        )
        .expect("write config");

        let config = load_from_file(Some(file.path().to_path_buf())).expect("config loads");
        assert_eq!(config.database.path, "/tmp/from-file.db");
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn json_file_round_trips() {
        let mut file = NamedTempFile::with_suffix(".json").expect("temp file");
        write!(file, r#"{{"database": {{"path": "/tmp/from-json.db"}}}}"#).expect("write config");

        let config = load_from_file(Some(file.path().to_path_buf())).expect("config loads");
        assert_eq!(config.database.path, "/tmp/from-json.db");
        assert_eq!(config.database.pool_size, 5);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = load_from_file(Some(PathBuf::from("/definitely/not/here.toml")));
        assert!(matches!(result, Err(AlarmDeskError::Config(_))));
    }
}
