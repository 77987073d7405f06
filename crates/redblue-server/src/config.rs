//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Turns on debug logging unless `logging.level` is set explicitly.
    #[serde(default)]
    pub debug: bool,

    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "redblue_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "red-blue.sqlite".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    redblue_db::DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    redblue_db::DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// The tracing filter to install.
    ///
    /// `debug = true` raises the default `info` level to `debug`; an
    /// explicitly configured level always wins.
    pub fn log_filter(&self) -> String {
        if self.debug && self.logging.level == default_log_level() {
            "debug".to_string()
        } else {
            self.logging.level.clone()
        }
    }

    /// Storage tunables derived from `[database]`.
    pub fn db_settings(&self) -> redblue_db::DbRuntimeSettings {
        redblue_db::DbRuntimeSettings {
            busy_timeout_ms: self.database.busy_timeout_ms,
            pool_max_size: self.database.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `REDBLUE_HOST` overrides `server.host`
/// - `REDBLUE_PORT` overrides `server.port`
/// - `REDBLUE_DB_PATH` overrides `database.path`
/// - `REDBLUE_LOG_LEVEL` overrides `logging.level`
/// - `REDBLUE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `REDBLUE_DEBUG` overrides `debug` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => parse_config(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    if let Ok(host) = std::env::var("REDBLUE_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("REDBLUE_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("REDBLUE_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("REDBLUE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("REDBLUE_LOG_JSON") {
        config.logging.json = is_truthy(&json);
    }
    if let Ok(debug) = std::env::var("REDBLUE_DEBUG") {
        config.debug = is_truthy(&debug);
    }

    Ok(config)
}

/// Parses configuration from TOML text without consulting the environment.
///
/// # Errors
///
/// Returns `ConfigError::Parse` on malformed TOML or mistyped values.
pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(contents)?)
}

fn is_truthy(value: &str) -> bool {
    value == "true" || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("").expect("empty config should parse");
        assert!(!config.debug);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, "red-blue.sqlite");
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r#"
            debug = true

            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            path = "/tmp/lobby.sqlite"
            busy_timeout_ms = 1000

            [logging]
            json = true
            "#,
        )
        .expect("config should parse");

        assert!(config.debug);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, "/tmp/lobby.sqlite");
        assert_eq!(config.db_settings().busy_timeout_ms, 1000);
        assert_eq!(config.db_settings().pool_max_size, 8);
        assert!(config.logging.json);
    }

    #[test]
    fn debug_flag_raises_default_level_only() {
        let mut config = Config {
            debug: true,
            ..Config::default()
        };
        assert_eq!(config.log_filter(), "debug");

        config.logging.level = "warn".to_string();
        assert_eq!(config.log_filter(), "warn");

        config.debug = false;
        config.logging.level = "info".to_string();
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = parse_config("[server]\nport = \"not a number\"").expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("absent.toml");
        let config = load_config(path.to_str()).expect("missing file is not an error");
        assert_eq!(config.server.host, default_host());
    }
}
