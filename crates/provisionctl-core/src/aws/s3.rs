//! S3 object listing

use aws_sdk_s3::Client;
use aws_smithy_types::date_time::Format;
use tracing::debug;

use super::remote_error;
use crate::error::Result;
use crate::resource::{ListOptions, ObjectSummary};

/// List a single page of objects in `bucket`
///
/// A truncated listing is logged, not followed.
pub(crate) async fn list_objects(
    client: &Client,
    bucket: &str,
    options: &ListOptions,
) -> Result<Vec<ObjectSummary>> {
    let response = client
        .list_objects_v2()
        .bucket(bucket)
        .set_prefix(options.prefix.clone())
        .set_max_keys(options.max_keys)
        .send()
        .await
        .map_err(|e| remote_error(&e))?;

    let objects: Vec<ObjectSummary> = response
        .contents()
        .iter()
        .filter_map(|obj| {
            let key = obj.key()?;
            Some(ObjectSummary {
                key: key.to_string(),
                size: obj.size(),
                last_modified: obj.last_modified().and_then(|t| t.fmt(Format::DateTime).ok()),
            })
        })
        .collect();

    if response.is_truncated().unwrap_or(false) {
        debug!(bucket, returned = objects.len(), "listing truncated to first page");
    }

    Ok(objects)
}
