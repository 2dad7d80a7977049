//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Data file `{0}` is not valid YAML")]
    Yaml(PathBuf, #[source] serde_yaml::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}
