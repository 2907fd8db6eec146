//! The remote service capability consumed by the provisioner and workflows
//!
//! [`crate::aws::AwsServiceClient`] is the production implementation. Tests
//! substitute fakes or the generated `MockRemoteServiceClient`.

use async_trait::async_trait;

use crate::error::Result;
use crate::resource::{ListOptions, ObjectSummary, Record, ResourceSpec, ResourceStatus};

/// Operations a managed storage/database provider must offer
///
/// Implementations classify provider faults: a create for a name that is
/// already taken returns [`crate::CoreError::AlreadyExists`], a request the
/// provider rejects as malformed returns [`crate::CoreError::InvalidSpec`], and
/// everything else returns [`crate::CoreError::Remote`] with the provider's
/// code and message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteServiceClient: Send + Sync {
    /// Submit a single creation request
    async fn submit_create(&self, spec: &ResourceSpec) -> Result<()>;

    /// Fetch the current status of a resource
    async fn get_status(&self, name: &str) -> Result<ResourceStatus>;

    /// List one page of objects in a bucket
    async fn list_objects(&self, bucket: &str, options: &ListOptions)
    -> Result<Vec<ObjectSummary>>;

    /// Store a single record in a resource
    async fn put_record(&self, resource: &str, record: &Record) -> Result<()>;
}
