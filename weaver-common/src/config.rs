//! Configuration loading and resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (folded into 1 by clap's `env` attribute)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: startup continues with a warning and
//! defaults. A TOML file that exists but does not parse is.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "WEAVER_CONFIG";

pub const DEFAULT_BIND: &str = "127.0.0.1:5790";
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5790";
/// Stem archives are large; 512 MiB per request
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;
pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Server listen address, e.g. "127.0.0.1:5790"
    #[serde(default)]
    pub bind: Option<String>,

    /// Maximum request body size accepted by the server
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    /// Artificial analysis delay in milliseconds
    #[serde(default)]
    pub analysis_delay_ms: Option<u64>,

    /// Base URL the client talks to
    #[serde(default)]
    pub server_url: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Locate the config file: `$WEAVER_CONFIG`, else the platform config dir
///
/// Linux: `~/.config/stem-weaver/config.toml`
/// macOS: `~/Library/Application Support/stem-weaver/config.toml`
/// Windows: `%APPDATA%\stem-weaver\config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    dirs::config_dir().map(|d| d.join("stem-weaver").join("config.toml"))
}

/// Load TOML config from `path`
///
/// Missing file → warning + defaults. Unreadable or malformed file → error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load the config file found by [`config_file_path`], or defaults
pub fn load_default_toml_config() -> Result<TomlConfig> {
    match config_file_path() {
        Some(path) => load_toml_config(&path),
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Command-line (or environment) overrides for the server
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub bind: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub analysis_delay_ms: Option<u64>,
    pub log_level: Option<String>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
    pub analysis_delay_ms: u64,
    pub log_level: String,
}

impl ServerConfig {
    /// Merge overrides over the TOML config over compiled defaults
    pub fn resolve(overrides: ServerOverrides, toml: &TomlConfig) -> Result<Self> {
        let bind_str = overrides
            .bind
            .or_else(|| toml.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_str, e)))?;

        let max_upload_bytes = overrides
            .max_upload_bytes
            .or(toml.max_upload_bytes)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be greater than 0".to_string()));
        }

        Ok(Self {
            bind,
            max_upload_bytes,
            analysis_delay_ms: overrides
                .analysis_delay_ms
                .or(toml.analysis_delay_ms)
                .unwrap_or(DEFAULT_ANALYSIS_DELAY_MS),
            log_level: overrides
                .log_level
                .unwrap_or_else(|| toml.logging.level.clone()),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5790)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            log_level: default_log_level(),
        }
    }
}

/// Client base URL: override, else TOML, else default
pub fn resolve_server_url(cli_arg: Option<String>, toml: &TomlConfig) -> String {
    cli_arg
        .or_else(|| toml.server_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}
