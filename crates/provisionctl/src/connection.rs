//! Client construction from config plus command-line overrides

use provisionctl_core::AwsServiceClient;
use provisionctl_core::config::{AwsSettings, Config};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::Result as CliResult;

/// Holds the loaded config and builds service clients on demand
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    region: Option<String>,
    endpoint_url: Option<String>,
}

impl ConnectionManager {
    /// Create a new connection manager with a custom config path
    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
            region: None,
            endpoint_url: None,
        }
    }

    /// Apply `--region` / `--endpoint-url`
    pub fn with_overrides(mut self, region: Option<String>, endpoint_url: Option<String>) -> Self {
        self.region = region;
        self.endpoint_url = endpoint_url;
        self
    }

    /// Config file in use: the explicit `--config-file`, else the default location
    pub fn resolved_config_path(&self) -> CliResult<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_path()?),
        }
    }

    /// Effective AWS settings, command-line flags winning over the config file
    pub fn aws_settings(&self) -> AwsSettings {
        let mut settings = self.config.aws.clone();
        if let Some(region) = &self.region {
            settings.region = Some(region.clone());
        }
        if let Some(endpoint) = &self.endpoint_url {
            settings.endpoint_url = Some(endpoint.clone());
            // Emulators rarely support virtual-hosted buckets
            settings.force_path_style = true;
        }
        settings
    }

    /// Build a DynamoDB + S3 client
    pub async fn create_client(&self) -> CliResult<AwsServiceClient> {
        let settings = self.aws_settings();
        debug!(
            region = ?settings.region,
            profile = ?settings.profile,
            endpoint = ?settings.endpoint_url,
            "Creating AWS client"
        );
        if settings.endpoint_url.is_some() {
            info!("Using custom endpoint URL");
        }

        Ok(AwsServiceClient::from_settings(&settings).await?)
    }
}
