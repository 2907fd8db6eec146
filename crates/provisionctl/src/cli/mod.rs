//! CLI structure and command definitions
//!
//! Defines the command-line interface using clap. Resource commands (`bucket`,
//! `table`, `item`) map one-to-one onto service calls; `run` chains them into
//! the list → create → insert demo.

use clap::{Parser, Subcommand};

pub mod resources;

pub use resources::*;

/// Provision DynamoDB tables and poke at S3 buckets
#[derive(Parser, Debug)]
#[command(name = "provisionctl")]
#[command(version, about = "Provision DynamoDB tables, list S3 buckets and insert records")]
#[command(long_about = "
Provision DynamoDB tables, list S3 buckets and insert records

Credentials and region come from the usual AWS sources (environment, shared
config files, instance metadata). Resource names and defaults can live in a
config file; see `provisionctl config init`.

EXAMPLES:
    # Write a starter config
    provisionctl config init

    # Run the list -> create -> insert demo from config
    provisionctl run

    # Create a table and wait until it is ACTIVE
    provisionctl table create MyTestTable --partition-key id:S --wait

    # Insert an item
    provisionctl item put MyTestTable --item '{\"id\":\"001\",\"name\":\"Test Item\"}'

    # Point at LocalStack
    provisionctl --endpoint-url http://localhost:4566 bucket list my-bucket

For more help on a specific command, run:
    provisionctl <command> --help
")]
pub struct Cli {
    /// Path to alternate configuration file
    #[arg(long, global = true, env = "PROVISIONCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// AWS region (overrides config and environment)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Service endpoint override, e.g. a local emulator
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Auto,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Table output
    Table,
}

impl OutputFormat {
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Json | Self::Yaml)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the demo: list a bucket, create a table, insert a record
    #[command(after_help = "EXAMPLES:
    # Everything from the config file
    provisionctl run

    # Override resources on the command line
    provisionctl run --bucket my-cli-demo-bucket --table MyTestTable \\
        --item '{\"id\":\"001\",\"name\":\"Test Item\"}'

    # Exit non-zero if any step failed
    provisionctl run --strict
")]
    Run(RunArgs),

    /// S3 bucket operations
    #[command(subcommand)]
    Bucket(BucketCommands),

    /// DynamoDB table operations
    #[command(subcommand)]
    Table(TableCommands),

    /// DynamoDB item operations
    #[command(subcommand)]
    Item(ItemCommands),

    /// Configuration file management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    #[command(visible_alias = "ver")]
    Version,
}
