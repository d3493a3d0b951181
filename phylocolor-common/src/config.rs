//! Configuration loading and config file resolution
//!
//! Config file location priority:
//! 1. Command-line argument (highest priority)
//! 2. `PHYLOCOLOR_CONFIG` environment variable
//! 3. `<user config dir>/phylocolor/config.toml`
//! 4. Compiled defaults (no file)
//!
//! A missing config file never stops startup; callers get [`TomlConfig::default`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PHYLOCOLOR_CONFIG";

/// Default NCBI Entrez E-utilities endpoint
pub const DEFAULT_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Configuration loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Path to the SQLite reference taxonomy table
    #[serde(default)]
    pub reference_db: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Remote lineage lookup settings
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

/// Remote taxonomy service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    /// Whether remote fallback may be used at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// E-utilities base URL (no trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// NCBI API key (raises the service's rate limit)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Contact address sent with each request
    #[serde(default)]
    pub email: Option<String>,

    /// Minimum delay between consecutive remote calls
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            api_key: None,
            email: None,
            min_delay_ms: default_min_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_EUTILS_BASE_URL.to_string()
}

fn default_min_delay_ms() -> u64 {
    340 // NCBI allows 3 requests/second without a key
}

fn default_timeout_secs() -> u64 {
    30
}

/// Locates the config file following the priority order above
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Returns the config file path to read, if any tier names one.
    ///
    /// The user config dir tier only counts when the file exists there;
    /// explicit CLI/ENV paths are returned as given so that a typo is reported.
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|p| p.exists())
    }

    /// Load the resolved config, falling back to compiled defaults
    pub fn load(&self) -> Result<TomlConfig> {
        match self.config_path() {
            Some(path) => {
                let config = load_toml_config(&path)?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            None => {
                debug!("No config file found, using compiled defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// `<user config dir>/phylocolor/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("phylocolor").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Read config {} failed: {}", path.display(), e))
    })?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config {} failed: {}", path.display(), e)))
}
