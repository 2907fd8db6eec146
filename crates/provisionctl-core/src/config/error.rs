//! Error types for configuration operations

use thiserror::Error;

/// Errors that can occur during configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config from {path}: {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save config to {path}: {source}")]
    SaveError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Config file already exists at {path}")]
    AlreadyExists { path: String },

    #[error("Missing setting '{key}'. {hint}")]
    MissingSetting { key: String, hint: String },

    #[error("Missing AWS region configuration")]
    MissingRegion,

    #[error("Failed to determine config directory")]
    ConfigDirError,
}

impl ConfigError {
    pub fn missing(key: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingSetting {
            key: key.into(),
            hint: hint.into(),
        }
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
