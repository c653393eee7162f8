//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Parsed settings
    pub schema: ConfigSchema,
    /// File the settings came from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used when none is present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => p.to_path_buf(),
            None => match find_config_file() {
                Some(found) => found,
                None => return Ok(Self::defaults()),
            },
        };

        Ok(Self {
            schema: load_config_file(&config_path)?,
            path: Some(config_path),
        })
    }

    /// Load with defaults only (no file)
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [".apkplan.toml", "apkplan.toml", ".config/apkplan.toml"];

    candidates
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}", path.display())).with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path.display(), e.message()),
        )
        .with_source(e)
    })
}
