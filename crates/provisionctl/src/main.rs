use anyhow::Result;
use clap::Parser;
use provisionctl_core::CancellationToken;
use provisionctl_core::config::Config;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{Cli, Commands};
use connection::ConnectionManager;
use error::ProvisionCtlError;

/// Conventional exit status for a process stopped by SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    let conn_mgr = match load_config(&cli) {
        Ok(conn_mgr) => conn_mgr,
        Err(e) => {
            e.print_diagnostic();
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();

    // Interrupt drops whatever request is in flight, including any pending step of `run`
    let result = tokio::select! {
        result = execute_command(&cli, &conn_mgr, &cancel) => result,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            warn!("Interrupt received, aborting");
            eprintln!("Interrupted");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    };

    if let Err(e) = result {
        e.print_diagnostic();
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    // Check for RUST_LOG env var first, then fall back to verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "provisionctl=warn,provisionctl_core=warn",
            1 => "provisionctl=info,provisionctl_core=info",
            2 => "provisionctl=debug,provisionctl_core=debug",
            _ => "provisionctl=trace,provisionctl_core=trace,aws_smithy_runtime=debug",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

/// Load configuration from the explicit path or the default location
fn load_config(cli: &Cli) -> Result<ConnectionManager, ProvisionCtlError> {
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        (Config::load_from_path(&path)?, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };

    Ok(ConnectionManager::with_config_path(config, config_path)
        .with_overrides(cli.region.clone(), cli.endpoint_url.clone()))
}

async fn execute_command(
    cli: &Cli,
    conn_mgr: &ConnectionManager,
    cancel: &CancellationToken,
) -> Result<(), ProvisionCtlError> {
    trace!("Executing command: {:?}", cli.command);
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            if cli.output.is_structured() {
                let output_data = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "name": env!("CARGO_PKG_NAME"),
                });
                output::print_output(&output_data, cli.output)?;
            } else {
                println!("provisionctl {}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        }
        Commands::Run(args) => commands::run::handle_run(args, conn_mgr, cli.output, cancel).await,
        Commands::Bucket(cmd) => {
            commands::bucket::handle_bucket_command(cmd, conn_mgr, cli.output).await
        }
        Commands::Table(cmd) => {
            commands::table::handle_table_command(cmd, conn_mgr, cli.output, cancel).await
        }
        Commands::Item(cmd) => commands::item::handle_item_command(cmd, conn_mgr, cli.output).await,
        Commands::Config(cmd) => {
            commands::config::handle_config_command(cmd, conn_mgr, cli.output).await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!(
            "Command completed successfully in {:.3}s",
            duration.as_secs_f64()
        ),
        Err(e) => warn!(
            "Command failed after {:.3}s: {}",
            duration.as_secs_f64(),
            e
        ),
    }

    result
}

/// Short command description for logs; never includes item payloads
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Run(_) => "run".to_string(),
        Commands::Bucket(cmd) => format!("bucket {:?}", cmd),
        Commands::Table(cmd) => format!("table {:?}", cmd),
        Commands::Item(cli::ItemCommands::Put { table, .. }) => format!("item put {}", table),
        Commands::Config(cmd) => format!("config {:?}", cmd),
        Commands::Version => "version".to_string(),
    }
}
