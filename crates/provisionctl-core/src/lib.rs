//! # provisionctl-core
//!
//! Library behind the `provisionctl` CLI: create a table, wait until it is
//! usable, list bucket contents, and insert records, on top of S3 and DynamoDB.
//!
//! ## Layout
//!
//! - [`provisioner`] - create a resource and wait for it to become `ACTIVE`
//! - [`client`] - the [`RemoteServiceClient`] capability the provisioner drives
//! - [`aws`] - the DynamoDB/S3 implementation of that capability
//! - [`resource`] - specs, statuses, handles and records
//! - [`progress`] - optional progress callbacks for spinners
//! - [`workflow`] - the list → create → insert demo sequence
//! - [`config`] - TOML configuration
//! - [`error`] - [`CoreError`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use provisionctl_core::{AttributeType, AwsServiceClient, ResourceProvisioner, ResourceSpec};
//! use provisionctl_core::config::Config;
//! use std::time::Duration;
//!
//! let config = Config::load()?;
//! let client = AwsServiceClient::from_settings(&config.aws).await?;
//!
//! let spec = ResourceSpec::builder("MyTestTable")
//!     .partition_key("id", AttributeType::String)
//!     .build()?;
//!
//! let provisioner = ResourceProvisioner::new(&client);
//! let mut handle = provisioner.create(&spec).await?;
//! provisioner
//!     .await_ready(&mut handle, config.wait.poll_interval(), config.wait.timeout())
//!     .await?;
//! ```

pub mod aws;
pub mod client;
pub mod config;
pub mod error;
pub mod progress;
pub mod provisioner;
pub mod resource;
pub mod workflow;

pub use aws::AwsServiceClient;
pub use client::RemoteServiceClient;
pub use config::{Config, ConfigError};
pub use error::{CoreError, Result};
pub use progress::{ProgressCallback, ProgressEvent};
pub use provisioner::ResourceProvisioner;
pub use resource::{
    AttributeType, KeyAttribute, KeyRole, ListOptions, ObjectSummary, Record, ResourceHandle,
    ResourceSpec, ResourceStatus, Throughput,
};
pub use workflow::{DemoPlan, DemoReport, DemoStep, StepOutcome, StepOutput, run_demo};

// Token accepted by the cancellable wait operations
pub use tokio_util::sync::CancellationToken;
