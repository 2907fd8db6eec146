//! Bucket command implementations

use colored::Colorize;
use provisionctl_core::{ListOptions, RemoteServiceClient};
use tracing::debug;

use crate::cli::{BucketCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::print_output;

pub async fn handle_bucket_command(
    cmd: &BucketCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        BucketCommands::List {
            bucket,
            prefix,
            max_keys,
        } => {
            let options = ListOptions {
                prefix: prefix.clone(),
                max_keys: *max_keys,
            };
            handle_list(conn_mgr, bucket, &options, output_format).await
        }
    }
}

async fn handle_list(
    conn_mgr: &ConnectionManager,
    bucket: &str,
    options: &ListOptions,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client().await?;
    let objects = client.list_objects(bucket, options).await?;
    debug!(bucket, count = objects.len(), "listed objects");

    if objects.is_empty() && !output_format.is_structured() {
        println!("No objects found in bucket {}", bucket.bold());
        return Ok(());
    }

    print_output(&objects, output_format)?;
    Ok(())
}
