//! Subcommand definitions for buckets, tables, items, config and the demo

use clap::{Args, Subcommand};
use provisionctl_core::config::WaitSettings;

/// Poll cadence overrides; unset values fall back to the `[wait]` config section
#[derive(Args, Debug, Clone, Default)]
pub struct WaitArgs {
    /// Maximum time to wait in seconds
    #[arg(long)]
    pub wait_timeout: Option<u64>,

    /// Polling interval in seconds
    #[arg(long)]
    pub wait_interval: Option<u64>,
}

impl WaitArgs {
    pub fn resolve(&self, configured: &WaitSettings) -> WaitSettings {
        WaitSettings {
            poll_interval_secs: self.wait_interval.unwrap_or(configured.poll_interval_secs),
            timeout_secs: self.wait_timeout.unwrap_or(configured.timeout_secs),
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bucket to list (overrides demo.bucket)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Table to create (overrides demo.table.name)
    #[arg(long)]
    pub table: Option<String>,

    /// Record to insert as a JSON object (overrides demo.record)
    #[arg(long)]
    pub item: Option<String>,

    /// Exit with an error if any step failed
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub wait: WaitArgs,
}

#[derive(Subcommand, Debug)]
pub enum BucketCommands {
    /// List objects in a bucket (first page only)
    #[command(visible_alias = "ls")]
    List {
        /// Bucket name
        bucket: String,

        /// Only list keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Maximum number of keys to return
        #[arg(long)]
        max_keys: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TableCommands {
    /// Create a table
    #[command(after_help = "EXAMPLES:
    # On-demand table keyed by a string id
    provisionctl table create MyTestTable --partition-key id

    # Provisioned table with a numeric sort key, waiting until ACTIVE
    provisionctl table create Events --partition-key pk:S --sort-key ts:N \\
        --read-capacity 5 --write-capacity 5 --wait
")]
    Create {
        /// Table name
        name: String,

        /// Partition key as NAME[:S|N|B] (type defaults to S)
        #[arg(long)]
        partition_key: String,

        /// Sort key as NAME[:S|N|B]
        #[arg(long)]
        sort_key: Option<String>,

        /// Provisioned read capacity units
        #[arg(long, requires = "write_capacity")]
        read_capacity: Option<i64>,

        /// Provisioned write capacity units
        #[arg(long, requires = "read_capacity")]
        write_capacity: Option<i64>,

        /// Wait until the table is ACTIVE
        #[arg(long)]
        wait: bool,

        #[command(flatten)]
        wait_args: WaitArgs,
    },

    /// Show a table's current status
    Status {
        /// Table name
        name: String,
    },

    /// Wait until a table is ACTIVE
    Wait {
        /// Table name
        name: String,

        #[command(flatten)]
        wait_args: WaitArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Insert (or replace) a single item
    Put {
        /// Table name
        table: String,

        /// Item as a JSON object
        #[arg(long)]
        item: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the config file location
    Path,
    /// Show the effective configuration
    Show,
    /// Write a starter config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
