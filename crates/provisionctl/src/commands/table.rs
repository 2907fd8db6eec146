//! Table command implementations

use provisionctl_core::config::WaitSettings;
use provisionctl_core::{
    CancellationToken, KeyAttribute, KeyRole, RemoteServiceClient, ResourceHandle,
    ResourceProvisioner, ResourceSpec, ResourceStatus,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::{OutputFormat, TableCommands};
use crate::commands::wait::{WaitSpinner, format_status};
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::print_output;

#[derive(Debug, Serialize)]
struct TableState<'a> {
    name: &'a str,
    status: ResourceStatus,
}

pub async fn handle_table_command(
    cmd: &TableCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
    cancel: &CancellationToken,
) -> CliResult<()> {
    match cmd {
        TableCommands::Create {
            name,
            partition_key,
            sort_key,
            read_capacity,
            write_capacity,
            wait,
            wait_args,
        } => {
            let spec = build_spec(
                name,
                partition_key,
                sort_key.as_deref(),
                read_capacity.zip(*write_capacity),
            )?;
            let wait_settings = wait.then(|| wait_args.resolve(&conn_mgr.config.wait));
            handle_create(conn_mgr, &spec, wait_settings, output_format, cancel).await
        }
        TableCommands::Status { name } => handle_status(conn_mgr, name, output_format).await,
        TableCommands::Wait { name, wait_args } => {
            let wait_settings = wait_args.resolve(&conn_mgr.config.wait);
            handle_wait(conn_mgr, name, &wait_settings, output_format, cancel).await
        }
    }
}

/// Build and validate a spec from command-line key arguments
pub fn build_spec(
    name: &str,
    partition_key: &str,
    sort_key: Option<&str>,
    throughput: Option<(i64, i64)>,
) -> CliResult<ResourceSpec> {
    let mut builder = ResourceSpec::builder(name)
        .key(KeyAttribute::parse(partition_key, KeyRole::Partition)?);
    if let Some(sort_key) = sort_key {
        builder = builder.key(KeyAttribute::parse(sort_key, KeyRole::Sort)?);
    }
    if let Some((read, write)) = throughput {
        builder = builder.throughput(read, write);
    }
    Ok(builder.build()?)
}

async fn handle_create(
    conn_mgr: &ConnectionManager,
    spec: &ResourceSpec,
    wait: Option<WaitSettings>,
    output_format: OutputFormat,
    cancel: &CancellationToken,
) -> CliResult<()> {
    let client = conn_mgr.create_client().await?;

    let Some(wait) = wait else {
        let provisioner = ResourceProvisioner::new(&client);
        let handle = provisioner.create(spec).await?;
        info!(table = handle.name(), "table creation submitted");
        return print_state(handle.name(), ResourceStatus::Creating, output_format, true);
    };

    let spinner = WaitSpinner::new(format!("Creating table {}", spec.name()));
    let provisioner = ResourceProvisioner::new(&client).with_progress(spinner.callback());
    let result = provisioner
        .create_and_wait(spec, wait.poll_interval(), wait.timeout(), cancel)
        .await;
    spinner.finish();

    let handle = result?;
    print_state(handle.name(), ResourceStatus::Active, output_format, false)
}

async fn handle_status(
    conn_mgr: &ConnectionManager,
    name: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client().await?;
    let status = client.get_status(name).await?;
    debug!(table = name, %status, "fetched table status");
    print_state(name, status, output_format, false)
}

async fn handle_wait(
    conn_mgr: &ConnectionManager,
    name: &str,
    wait: &WaitSettings,
    output_format: OutputFormat,
    cancel: &CancellationToken,
) -> CliResult<()> {
    let client = conn_mgr.create_client().await?;

    let spinner = WaitSpinner::new(format!("Waiting for table {}", name));
    let provisioner = ResourceProvisioner::new(&client).with_progress(spinner.callback());
    let mut handle = ResourceHandle::existing(name);
    let result = provisioner
        .await_ready_cancellable(&mut handle, wait.poll_interval(), wait.timeout(), cancel)
        .await;
    spinner.finish();

    result?;
    print_state(name, ResourceStatus::Active, output_format, false)
}

fn print_state(
    name: &str,
    status: ResourceStatus,
    output_format: OutputFormat,
    hint_wait: bool,
) -> CliResult<()> {
    if output_format.is_structured() {
        print_output(TableState { name, status }, output_format)?;
        return Ok(());
    }

    println!("Table {}: {}", name, format_status(status));
    if hint_wait {
        println!("To wait until it is ACTIVE, run: provisionctl table wait {}", name);
    }
    Ok(())
}
