//! # Service Configuration
//!
//! Configuration for the inventory service binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     INVENTORY_PORT=8080                                                │
//! │     INVENTORY_DATABASE_PATH=/var/lib/inventory/inventory.db            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $INVENTORY_CONFIG, or ./inventory.toml when present                │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:5000, /api, ./inventory.db, ./uploads                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # inventory.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 5000
//! api_base_path = "/api"
//!
//! [database]
//! path = "./inventory.db"
//! max_connections = 5
//!
//! [receipts]
//! directory = "./uploads"
//! max_upload_bytes = 5242880
//!
//! [feed]
//! interval_secs = 10
//! top_n = 10
//! max_subscribers = 1024
//! write_timeout_ms = 2000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use inventory_core::{DEFAULT_TOP_N, MAX_RECEIPT_BYTES};
use inventory_db::DbConfig;
use inventory_feed::FeedConfig;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "INVENTORY_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "inventory.toml";

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment variable held a value of the wrong type.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Server Settings
// =============================================================================

/// Listener and routing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for the product and receipt routes. `/websocket` and
    /// `/health` are always mounted at the root.
    #[serde(default = "default_api_base_path")]
    pub api_base_path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_api_base_path() -> String {
    "/api".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            api_base_path: default_api_base_path(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Database Settings
// =============================================================================

/// Product store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("./inventory.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Receipt Settings
// =============================================================================

/// Receipt store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptSettings {
    #[serde(default = "default_receipt_dir")]
    pub directory: PathBuf,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_receipt_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_max_upload_bytes() -> usize {
    MAX_RECEIPT_BYTES
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            directory: default_receipt_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

// =============================================================================
// Feed Settings
// =============================================================================

/// Ranking feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_top_n")]
    pub top_n: u32,

    #[serde(default = "default_max_subscribers")]
    pub max_subscribers: usize,

    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_top_n() -> u32 {
    DEFAULT_TOP_N
}

fn default_max_subscribers() -> usize {
    1024
}

fn default_write_timeout_ms() -> u64 {
    2000
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            interval_secs: default_interval_secs(),
            top_n: default_top_n(),
            max_subscribers: default_max_subscribers(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

// =============================================================================
// Service Config
// =============================================================================

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub receipts: ReceiptSettings,

    #[serde(default)]
    pub feed: FeedSettings,
}

impl ServiceConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$INVENTORY_CONFIG`, else
    ///    `./inventory.toml` if it exists)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit = config_path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match explicit {
            // A named file has to exist
            Some(path) => {
                info!(?path, "Loading config from file");
                Self::from_toml(&std::fs::read_to_string(&path)?)?
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    info!(?path, "Loading config from file");
                    Self::from_toml(&std::fs::read_to_string(&path)?)?
                } else {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = &self.server.api_base_path;
        if !base.starts_with('/') || base.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "api_base_path must start with '/' and not end with '/', got: {base:?}"
            )));
        }

        if self.receipts.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be greater than 0".into(),
            ));
        }

        if self.feed.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "feed interval_secs must be greater than 0".into(),
            ));
        }

        if self.feed.top_n == 0 {
            return Err(ConfigError::Invalid("feed top_n must be greater than 0".into()));
        }

        if self.feed.max_subscribers == 0 {
            return Err(ConfigError::Invalid(
                "feed max_subscribers must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `INVENTORY_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("INVENTORY_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("INVENTORY_PORT") {
            self.server.port = parse_env("INVENTORY_PORT", port)?;
            debug!(port = self.server.port, "Overriding port from environment");
        }

        if let Some(base) = lookup("INVENTORY_API_BASE_PATH") {
            self.server.api_base_path = base;
        }

        if let Some(path) = lookup("INVENTORY_DATABASE_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("INVENTORY_RECEIPT_DIR") {
            self.receipts.directory = PathBuf::from(dir);
        }

        if let Some(max) = lookup("INVENTORY_MAX_UPLOAD_BYTES") {
            self.receipts.max_upload_bytes = parse_env("INVENTORY_MAX_UPLOAD_BYTES", max)?;
        }

        if let Some(secs) = lookup("INVENTORY_FEED_INTERVAL_SECS") {
            self.feed.interval_secs = parse_env("INVENTORY_FEED_INTERVAL_SECS", secs)?;
        }

        Ok(())
    }

    // =========================================================================
    // Component Configs
    // =========================================================================

    /// Product store configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database.path.clone()).max_connections(self.database.max_connections)
    }

    /// Ranking feed configuration.
    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig::default()
            .interval(Duration::from_secs(self.feed.interval_secs))
            .top_n(self.feed.top_n)
            .max_subscribers(self.feed.max_subscribers)
            .write_timeout(Duration::from_millis(self.feed.write_timeout_ms))
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.server.api_base_path, "/api");
        assert_eq!(config.receipts.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.feed.top_n, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServiceConfig::from_toml(
            r#"
            [server]
            port = 8080

            [feed]
            interval_secs = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.feed.interval_secs, 3);
        assert_eq!(config.feed.max_subscribers, 1024);
        assert_eq!(config.database.path, PathBuf::from("./inventory.db"));
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let err = ServiceConfig::from_toml("[server]\nport = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides_win() {
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(env(&[
                ("INVENTORY_PORT", "9000"),
                ("INVENTORY_API_BASE_PATH", "/v2"),
                ("INVENTORY_RECEIPT_DIR", "/tmp/receipts"),
                ("INVENTORY_FEED_INTERVAL_SECS", "1"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.api_base_path, "/v2");
        assert_eq!(config.receipts.directory, PathBuf::from("/tmp/receipts"));
        assert_eq!(config.feed.interval_secs, 1);
    }

    #[test]
    fn test_unparsable_env_value_is_an_error() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides(env(&[("INVENTORY_PORT", "not-a-port")]))
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "INVENTORY_PORT", .. }
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = ServiceConfig::default();
        config.server.api_base_path = "/api/".to_string();
        assert!(config.validate().is_err());

        config.server.api_base_path = "api".to_string();
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.receipts.max_upload_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.feed.interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ServiceConfig::default();
        config.feed.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_component_configs() {
        let mut config = ServiceConfig::default();
        config.feed.interval_secs = 4;
        config.feed.write_timeout_ms = 500;

        let feed = config.feed_config();
        assert_eq!(feed.interval, Duration::from_secs(4));
        assert_eq!(feed.write_timeout, Duration::from_millis(500));

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("./inventory.db"));
        assert_eq!(db.max_connections, 5);
        assert_eq!(db.record_timeout, Duration::from_secs(15));
    }
}
