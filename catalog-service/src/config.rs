//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: CATALOG_, nested keys split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. System directory: /etc/catalog-service/config.toml
//! 4. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::handlers::DEFAULT_LIMIT;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "CATALOG_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Pagination defaults for list endpoints
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Storage collaborator configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name, attached to every log record
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level filter (trace, debug, info, warn, error, or an EnvFilter directive)
    ///
    /// When unset the level follows `environment`.
    #[serde(default)]
    pub log_level: Option<String>,

    /// Whole-request timeout in seconds, enforced by the HTTP layer
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Whether the service runs in a production environment
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "prod" | "production"
        )
    }

    /// Effective log filter: the explicit level, or `info` in production and `debug` elsewhere
    pub fn effective_log_level(&self) -> String {
        match self.log_level.as_deref() {
            Some(level) if !level.trim().is_empty() => level.to_string(),
            _ if self.is_production() => "info".to_string(),
            _ => "debug".to_string(),
        }
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pagination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Limit applied when the client omits `limit`
    #[serde(default = "default_limit")]
    pub default_limit: i32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

/// Storage collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Per-request budget for a storage list call in milliseconds
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Optional JSON file used to seed the in-memory repositories
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Get the storage query budget as Duration
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            seed_path: None,
        }
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS configuration (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            cors_mode: default_cors_mode(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_limit() -> i32 {
    DEFAULT_LIMIT
}

fn default_query_timeout_ms() -> u64 {
    5_000
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found wins per key):
    /// 1. Current working directory: ./config.toml
    /// 2. System directory: /etc/catalog-service/config.toml
    ///
    /// Environment variables (CATALOG_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so that higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still take precedence over the file.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Config file locations in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config.toml"),
            PathBuf::from("/etc/catalog-service/config.toml"),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "catalog-service".to_string(),
                port: default_port(),
                log_level: None,
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            pagination: PaginationConfig::default(),
            storage: StorageConfig::default(),
            middleware: MiddlewareConfig::default(),
        }
    }
}
