//! Item command implementations

use colored::Colorize;
use provisionctl_core::{Record, RemoteServiceClient};
use serde_json::{Value, json};

use crate::cli::{ItemCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::{ProvisionCtlError, Result as CliResult};
use crate::output::print_output;

pub async fn handle_item_command(
    cmd: &ItemCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        ItemCommands::Put { table, item } => {
            // Bad JSON fails before any client is built
            let record = parse_record(item)?;
            handle_put(conn_mgr, table, &record, output_format).await
        }
    }
}

async fn handle_put(
    conn_mgr: &ConnectionManager,
    table: &str,
    record: &Record,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client().await?;
    client.put_record(table, record).await?;

    if output_format.is_structured() {
        print_output(
            json!({ "table": table, "inserted": true, "item": record }),
            output_format,
        )?;
    } else {
        println!(
            "{} Item inserted into {}",
            "\u{2713}".green(),
            table.bold()
        );
    }
    Ok(())
}

/// Parse a `--item` argument; anything but a JSON object is rejected
pub fn parse_record(input: &str) -> CliResult<Record> {
    let value: Value = serde_json::from_str(input).map_err(|e| {
        ProvisionCtlError::invalid_input(format!("--item is not valid JSON: {}", e))
    })?;

    match value {
        Value::Object(record) => Ok(record),
        other => Err(ProvisionCtlError::invalid_input(format!(
            "--item must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
