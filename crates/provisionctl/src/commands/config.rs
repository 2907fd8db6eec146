//! Config command implementations

use colored::Colorize;
use provisionctl_core::config::Config;
use serde_json::json;
use tracing::debug;

use crate::cli::{ConfigCommands, OutputFormat};
use crate::connection::ConnectionManager;
use crate::error::{ProvisionCtlError, Result as CliResult};
use crate::output::print_output;

pub async fn handle_config_command(
    cmd: &ConfigCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Path => handle_path(conn_mgr, output_format),
        ConfigCommands::Show => handle_show(conn_mgr, output_format),
        ConfigCommands::Init { force } => handle_init(conn_mgr, *force, output_format),
    }
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = conn_mgr.resolved_config_path()?;

    if output_format.is_structured() {
        print_output(
            json!({
                "config_path": config_path.display().to_string(),
                "exists": config_path.exists(),
            }),
            output_format,
        )?;
    } else {
        println!("{}", config_path.display());
    }
    Ok(())
}

fn handle_show(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    if output_format.is_structured() {
        print_output(&conn_mgr.config, output_format)?;
        return Ok(());
    }

    let rendered = toml::to_string_pretty(&conn_mgr.config).map_err(|e| {
        ProvisionCtlError::OutputError {
            message: format!("TOML error: {}", e),
        }
    })?;
    print!("{}", rendered);
    Ok(())
}

fn handle_init(
    conn_mgr: &ConnectionManager,
    force: bool,
    output_format: OutputFormat,
) -> CliResult<()> {
    let config_path = conn_mgr.resolved_config_path()?;
    debug!(path = %config_path.display(), force, "writing starter config");

    Config::init_at(&config_path, force)?;

    if output_format.is_structured() {
        print_output(
            json!({ "config_path": config_path.display().to_string(), "created": true }),
            output_format,
        )?;
    } else {
        println!(
            "{} Wrote starter config to {}",
            "\u{2713}".green(),
            config_path.display().to_string().bold()
        );
        println!("Edit the [demo] section, then run: provisionctl run");
    }
    Ok(())
}
