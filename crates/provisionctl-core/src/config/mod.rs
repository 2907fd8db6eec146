//! Configuration for provisionctl
//!
//! Settings live in a TOML file under the platform config directory. Values
//! may reference environment variables with `${VAR}` or `${VAR:-default}`.
//!
//! # Sections
//!
//! - `[aws]` - region, named profile, endpoint override, operation timeout
//! - `[wait]` - poll interval and timeout used while waiting for tables
//! - `[demo]` - bucket, table and record used by `provisionctl run`

#![allow(clippy::module_inception)]

pub mod config;
pub mod error;

pub use config::{AwsSettings, Config, DemoSettings, TableSettings, WaitSettings};
pub use error::{ConfigError, Result};
