//! Setting resolution for phylocolor
//!
//! Each setting is resolved CLI → ENV → TOML. A value present in several
//! sources is not an error; the highest-priority one wins and the overlap is
//! logged.

use phylocolor_common::config::{RemoteConfig, TomlConfig};
use phylocolor_common::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment override for the reference table path
pub const REFERENCE_DB_ENV: &str = "PHYLOCOLOR_REFERENCE_DB";

/// Environment override for the NCBI API key
pub const API_KEY_ENV: &str = "PHYLOCOLOR_NCBI_API_KEY";

/// Reference table location
pub fn resolve_reference_db(cli: Option<&Path>, toml_config: &TomlConfig) -> Result<PathBuf> {
    if let Some(path) = cli {
        debug!("Reference database from command line");
        return Ok(path.to_path_buf());
    }

    if let Some(path) = std::env::var(REFERENCE_DB_ENV).ok().filter(|p| is_valid_value(p)) {
        debug!("Reference database from {}", REFERENCE_DB_ENV);
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = &toml_config.reference_db {
        debug!("Reference database from TOML config");
        return Ok(path.clone());
    }

    Err(Error::Config(format!(
        "Reference database not configured. Configure using one of:\n\
         1. Command line: --reference-db /path/to/taxonomy_reference.db\n\
         2. Environment: {}=/path/to/taxonomy_reference.db\n\
         3. TOML config: reference_db = \"/path/to/taxonomy_reference.db\"",
        REFERENCE_DB_ENV
    )))
}

/// NCBI API key, ENV before TOML; `None` means the unauthenticated rate limit
pub fn resolve_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV).ok().filter(|k| is_valid_value(k));
    let toml_key = toml_config
        .remote
        .api_key
        .clone()
        .filter(|k| is_valid_value(k));

    if env_key.is_some() && toml_key.is_some() {
        info!("NCBI API key found in environment and TOML config; using environment");
    }

    env_key.or(toml_key)
}

/// Remote settings with the resolved API key applied
pub fn resolve_remote_config(toml_config: &TomlConfig) -> RemoteConfig {
    RemoteConfig {
        api_key: resolve_api_key(toml_config),
        ..toml_config.remote.clone()
    }
}

/// Non-empty, non-whitespace
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}
