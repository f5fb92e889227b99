//! Configuration — parser limits and log level loaded from ~/.voltage/config.yaml.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors reading an explicitly requested config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    /// Maximum level for log output: error, warn, info, debug or trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Limits applied while parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Deepest expression nesting accepted before the parse is abandoned.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    256
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Default path for the config file.
pub fn default_config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".voltage").join("config.yaml"))
}

impl Config {
    /// Load config from the standard path (~/.voltage/config.yaml).
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load() -> Option<Self> {
        Self::load_if_present(&default_config_path()?)
    }

    /// Load config from `path`, or None if it is missing or unreadable.
    pub fn load_if_present(path: &Path) -> Option<Self> {
        match Self::load_from(path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::debug!(%err, "no usable config file");
                None
            }
        }
    }

    /// Load config from a specific file, reporting why it failed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}
