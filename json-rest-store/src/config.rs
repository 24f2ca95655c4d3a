//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: JSON_REST_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/json-rest-store/{service_name}/config.toml
//! 4. System directory: /etc/json-rest-store/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "catalog"
//! port = 8080
//!
//! [store]
//! sort_param = "sortBy"
//!
//! [[resources]]
//! path = "/products"
//! id_field = "sku"
//! operations = ["query", "read"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rest::OperationSet;

const APP_NAME: &str = "json-rest-store";
const ENV_PREFIX: &str = "JSON_REST_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Query translation settings shared by all resources
    #[serde(default)]
    pub store: StoreConfig,

    /// Resources to expose
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,
}

impl MiddlewareConfig {
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
        }
    }
}

/// Query translation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Query parameter carrying the sort instead of `sort(...)` keys
    #[serde(default)]
    pub sort_param: Option<String>,
}

/// One exposed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Collection path, e.g. `/users`
    pub path: String,

    /// Field identifying entities; also the item path parameter name
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Enabled operations; all six when omitted
    #[serde(default)]
    pub operations: OperationSet,
}

impl ResourceConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.path.starts_with('/') {
            return Err(format!("resource path '{}' must start with '/'", self.path));
        }
        if self.path.contains(['{', '}', '*']) {
            return Err(format!("resource path '{}' must not contain captures", self.path));
        }
        if self.id_field.is_empty() || self.id_field.contains(['/', '{', '}', '*']) {
            return Err(format!(
                "id field '{}' of resource '{}' is not a valid path parameter name",
                self.id_field, self.path
            ));
        }
        Ok(())
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    10 // 10 MB
}

fn default_id_field() -> String {
    "id".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is taken from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| APP_NAME.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            } else {
                tracing::debug!("No configuration at: {}", path.display());
            }
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path; environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every resource can be routed and no two share a path
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            resource.validate().map_err(config_error)?;

            let normalized = resource.path.strip_suffix('/').unwrap_or(&resource.path);
            if !seen.insert(normalized) {
                return Err(config_error(format!(
                    "resource path '{}' is configured more than once",
                    resource.path
                )));
            }
        }
        Ok(())
    }

    /// Config file locations in priority order (highest first)
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(APP_NAME)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: APP_NAME.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
            },
            middleware: MiddlewareConfig::default(),
            store: StoreConfig::default(),
            resources: Vec::new(),
        }
    }
}

fn config_error(message: String) -> Error {
    Error::from(figment::Error::from(message))
}
