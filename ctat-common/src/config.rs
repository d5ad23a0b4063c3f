//! Configuration loading and resolution
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Levels 1 and 2 arrive together as [`ConfigOverrides`] (the binary's
//! argument parser reads both); this module merges them with the TOML file
//! and the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, Result};

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "ctat";

/// Config file name inside [`APP_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings as they appear in `config.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub max_upload_mb: Option<usize>,
    pub status_display_ms: Option<u64>,
}

/// Values used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_upload_mb: usize,
    pub status_display_ms: u64,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5731,
            log_level: "info".to_string(),
            max_upload_mb: 25,
            status_display_ms: 3000,
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub max_upload_mb: Option<usize>,
    pub status_display_ms: Option<u64>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub max_upload_bytes: usize,
    pub status_display_ms: u64,
}

impl From<CompiledDefaults> for ServiceConfig {
    fn from(defaults: CompiledDefaults) -> Self {
        Self {
            host: defaults.host,
            port: defaults.port,
            log_level: defaults.log_level,
            max_upload_bytes: defaults.max_upload_mb * 1024 * 1024,
            status_display_ms: defaults.status_display_ms,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        CompiledDefaults::default().into()
    }
}

impl ServiceConfig {
    /// Merge overrides, TOML and compiled defaults
    ///
    /// # Errors
    /// `Error::Config` when the merged values are unusable (port 0, zero
    /// upload limit, zero status display time).
    pub fn resolve(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let host = overrides
            .host
            .clone()
            .or_else(|| toml_config.host.clone())
            .unwrap_or(defaults.host);
        let port = overrides.port.or(toml_config.port).unwrap_or(defaults.port);
        let log_level = overrides
            .log_level
            .clone()
            .or_else(|| toml_config.log_level.clone())
            .unwrap_or(defaults.log_level);
        let max_upload_mb = overrides
            .max_upload_mb
            .or(toml_config.max_upload_mb)
            .unwrap_or(defaults.max_upload_mb);
        let status_display_ms = overrides
            .status_display_ms
            .or(toml_config.status_display_ms)
            .unwrap_or(defaults.status_display_ms);

        if port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        if max_upload_mb == 0 {
            return Err(Error::Config("max_upload_mb must be non-zero".to_string()));
        }
        if status_display_ms == 0 {
            return Err(Error::Config("status_display_ms must be non-zero".to_string()));
        }

        Ok(Self {
            host,
            port,
            log_level,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            status_display_ms,
        })
    }

    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Platform config file location, e.g. `~/.config/ctat/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load `config.toml` from `path`
///
/// A missing file is not an error: a warning is logged and an empty config
/// returned so compiled defaults apply.
///
/// # Errors
/// `Error::Config` when the file exists but is not valid TOML for
/// [`TomlConfig`]; `Error::Io` when it exists but cannot be read.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!("Config file not found at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str::<TomlConfig>(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}
