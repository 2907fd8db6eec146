//! Configuration loading and saving
//!
//! Handles configuration loading from files and environment variables.
//! Configuration is stored in TOML format.

#[cfg(target_os = "macos")]
use directories::BaseDirs;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{ConfigError, Result};
use crate::resource::{AttributeType, KeyAttribute, Record, ResourceSpec, Throughput};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// AWS connection settings
    #[serde(default)]
    pub aws: AwsSettings,
    /// Table readiness polling
    #[serde(default)]
    pub wait: WaitSettings,
    /// Resources used by the demo sequence
    #[serde(default)]
    pub demo: DemoSettings,
}

/// AWS connection settings
///
/// Anything left unset falls back to the SDK's own resolution (environment,
/// shared config files, instance metadata).
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct AwsSettings {
    /// Region override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Named profile from the shared AWS config files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Endpoint override (e.g. LocalStack)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Per-operation timeout in milliseconds, including SDK retries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Use path-style S3 addressing (needed by most S3 emulators)
    #[serde(default)]
    pub force_path_style: bool,
}

/// Poll cadence and budget for readiness waits
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl WaitSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// Same cadence as the provider's own table_exists waiter: 20s x 25 attempts
fn default_poll_interval_secs() -> u64 {
    20
}

fn default_timeout_secs() -> u64 {
    500
}

/// Resources used by the demo sequence
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct DemoSettings {
    /// Bucket to list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Table to create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableSettings>,
    /// Record to insert into the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Record>,
}

/// Table declaration as written in the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TableSettings {
    pub name: String,
    #[serde(default)]
    pub key_schema: Vec<KeyAttribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throughput: Option<Throughput>,
}

impl TableSettings {
    /// Convert to a resource spec; validation happens when it is submitted
    pub fn to_spec(&self) -> ResourceSpec {
        ResourceSpec::new(self.name.clone(), self.key_schema.clone(), self.throughput)
    }
}

impl Config {
    /// A starter config mirroring the classic S3 + DynamoDB walkthrough
    pub fn sample() -> Self {
        let mut record = Record::new();
        record.insert("id".to_string(), "001".into());
        record.insert("name".to_string(), "Test Item".into());
        record.insert("description".to_string(), "This is a sample item".into());

        Config {
            aws: AwsSettings {
                region: Some("${AWS_REGION:-us-east-1}".to_string()),
                ..Default::default()
            },
            wait: WaitSettings::default(),
            demo: DemoSettings {
                bucket: Some("my-cli-demo-bucket".to_string()),
                table: Some(TableSettings {
                    name: "MyTestTable".to_string(),
                    key_schema: vec![KeyAttribute::partition("id", AttributeType::String)],
                    throughput: Some(Throughput {
                        read_capacity_units: 5,
                        write_capacity_units: 5,
                    }),
                }),
                record: Some(record),
            },
        }
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);

        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Write the sample config, refusing to clobber an existing file unless `force`
    pub fn init_at(config_path: &Path, force: bool) -> Result<Self> {
        if config_path.exists() && !force {
            return Err(ConfigError::AlreadyExists {
                path: config_path.display().to_string(),
            });
        }
        let config = Self::sample();
        config.save_to_path(config_path)?;
        Ok(config)
    }

    /// Get the path to the configuration file
    ///
    /// On macOS, `~/.config/provisionctl/config.toml` wins when that directory
    /// exists; otherwise the platform location is used:
    ///
    /// On Linux: ~/.config/provisionctl/config.toml
    /// On macOS: ~/Library/Application Support/com.provisionctl.provisionctl/config.toml
    /// On Windows: %APPDATA%\provisionctl\provisionctl\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            if let Some(base_dirs) = BaseDirs::new() {
                let linux_style_path = base_dirs
                    .home_dir()
                    .join(".config")
                    .join("provisionctl")
                    .join("config.toml");

                if linux_style_path
                    .parent()
                    .map(|p| p.exists())
                    .unwrap_or(false)
                {
                    return Ok(linux_style_path);
                }
            }
        }

        let proj_dirs = ProjectDirs::from("com", "provisionctl", "provisionctl")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references
    ///
    /// Unset variables without a default are left as-is.
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}
