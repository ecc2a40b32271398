//! Configuration loading for PanelMap tools
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. Config file (`.toml`, `.yaml`/`.yml` or `.json`)
//! 3. Environment variables prefixed with `PANELMAP_`, nested keys split on
//!    `__` (e.g. `PANELMAP_DATABASE__PATH=/var/lib/panelmap.db`)

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PANELMAP_";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/panelmap.db"),
            max_connections: 5,
            busy_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `info,panel_store=debug`
    pub level: String,
    /// Directory for daily log files; console only when unset
    pub dir: Option<PathBuf>,
    /// JSON lines in the log file
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            json: false,
        }
    }
}

/// Load configuration from defaults, an optional file and `PANELMAP_*` env
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    load_config_with_prefix(path, ENV_PREFIX)
}

/// Same as [`load_config`] with a custom environment prefix
pub fn load_config_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        figment = merge_file(figment, path)?;
    }

    let config: AppConfig = figment
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .map_err(|e| Error::Config(format!("Failed to load configuration: {}", e)))?;

    validate(&config)?;
    Ok(config)
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Config("Config file must have an extension".to_string()))?;

    match extension {
        "toml" => Ok(figment.merge(Toml::file(path))),
        "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
        "json" => Ok(figment.merge(Json::file(path))),
        _ => Err(Error::Config(format!(
            "Unsupported config file format: {}",
            extension
        ))),
    }
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.database.max_connections == 0 {
        return Err(Error::Config(
            "database.max_connections must be at least 1".to_string(),
        ));
    }
    if config.database.path.as_os_str().is_empty() {
        return Err(Error::Config("database.path cannot be empty".to_string()));
    }
    Ok(())
}
