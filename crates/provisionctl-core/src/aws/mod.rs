//! AWS implementation of [`RemoteServiceClient`]
//!
//! Tables live in DynamoDB and objects in S3. Both SDK clients are built from
//! one shared `SdkConfig` so they inherit the same credentials, retry policy
//! and HTTP client; per-client overrides come from [`AwsSettings`].
//!
//! ```rust,ignore
//! use provisionctl_core::aws::AwsServiceClient;
//! use provisionctl_core::config::AwsSettings;
//!
//! let settings = AwsSettings {
//!     region: Some("us-east-1".to_string()),
//!     endpoint_url: Some("http://localhost:4566".to_string()),
//!     force_path_style: true,
//!     ..Default::default()
//! };
//! let client = AwsServiceClient::from_settings(&settings).await?;
//! ```

pub mod dynamodb;
pub mod s3;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_smithy_types::timeout::TimeoutConfig;
use std::time::Duration;
use tracing::debug;

use crate::client::RemoteServiceClient;
use crate::config::{AwsSettings, ConfigError};
use crate::error::{CoreError, Result};
use crate::resource::{ListOptions, ObjectSummary, Record, ResourceSpec, ResourceStatus};

/// DynamoDB + S3 backed service client
#[derive(Clone)]
pub struct AwsServiceClient {
    dynamodb: aws_sdk_dynamodb::Client,
    s3: aws_sdk_s3::Client,
}

impl std::fmt::Debug for AwsServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsServiceClient")
            .field("region", &self.dynamodb.config().region())
            .finish()
    }
}

impl AwsServiceClient {
    /// Resolve an `SdkConfig` from the environment plus `settings`, then build
    pub async fn from_settings(settings: &AwsSettings) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &settings.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        Self::new(&sdk_config, settings)
    }

    /// Build both SDK clients from an existing `SdkConfig`
    pub fn new(sdk_config: &SdkConfig, settings: &AwsSettings) -> Result<Self> {
        if sdk_config.region().is_none() {
            return Err(CoreError::Config(ConfigError::MissingRegion));
        }

        let timeout_config = settings.timeout_ms.map(|ms| {
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_millis(ms))
                .build()
        });

        let mut dynamodb = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        let mut s3 = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(settings.force_path_style);

        if let Some(endpoint) = &settings.endpoint_url {
            dynamodb = dynamodb.endpoint_url(endpoint);
            s3 = s3.endpoint_url(endpoint);
        }

        if let Some(timeout_config) = timeout_config {
            dynamodb = dynamodb.timeout_config(timeout_config.clone());
            s3 = s3.timeout_config(timeout_config);
        }

        debug!(
            region = ?sdk_config.region(),
            endpoint = ?settings.endpoint_url,
            "built AWS service clients"
        );

        Ok(Self::from_clients(
            aws_sdk_dynamodb::Client::from_conf(dynamodb.build()),
            aws_sdk_s3::Client::from_conf(s3.build()),
        ))
    }

    /// Wrap pre-built SDK clients
    pub fn from_clients(dynamodb: aws_sdk_dynamodb::Client, s3: aws_sdk_s3::Client) -> Self {
        Self { dynamodb, s3 }
    }
}

#[async_trait]
impl RemoteServiceClient for AwsServiceClient {
    async fn submit_create(&self, spec: &ResourceSpec) -> Result<()> {
        dynamodb::create_table(&self.dynamodb, spec).await
    }

    async fn get_status(&self, name: &str) -> Result<ResourceStatus> {
        dynamodb::table_status(&self.dynamodb, name).await
    }

    async fn list_objects(
        &self,
        bucket: &str,
        options: &ListOptions,
    ) -> Result<Vec<ObjectSummary>> {
        s3::list_objects(&self.s3, bucket, options).await
    }

    async fn put_record(&self, resource: &str, record: &Record) -> Result<()> {
        dynamodb::put_item(&self.dynamodb, resource, record).await
    }
}

/// Convert any SDK error into [`CoreError::Remote`], keeping the provider's
/// error code and message verbatim
///
/// Works for both the DynamoDB and S3 clients since they share the smithy
/// runtime's `SdkError`.
pub(crate) fn remote_error<E, R>(err: &SdkError<E, R>) -> CoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service_err) => {
            let inner = service_err.err();
            CoreError::remote(
                inner.code().unwrap_or("Unknown"),
                inner.message().unwrap_or_default(),
            )
        }
        SdkError::TimeoutError(_) => {
            CoreError::remote("TimeoutError", DisplayErrorContext(err).to_string())
        }
        SdkError::DispatchFailure(_) => {
            CoreError::remote("DispatchFailure", DisplayErrorContext(err).to_string())
        }
        _ => CoreError::remote("SdkError", DisplayErrorContext(err).to_string()),
    }
}
