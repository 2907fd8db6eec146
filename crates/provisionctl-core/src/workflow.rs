//! The list → create → insert demo sequence
//!
//! Each step runs even if an earlier one failed, and each step's typed
//! outcome lands in the [`DemoReport`]. Deciding what a failure means (log,
//! exit non-zero, carry on) is left to the caller.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::client::RemoteServiceClient;
use crate::config::{ConfigError, DemoSettings, WaitSettings};
use crate::error::CoreError;
use crate::progress::ProgressCallback;
use crate::provisioner::ResourceProvisioner;
use crate::resource::{ListOptions, ObjectSummary, Record, ResourceSpec};

/// Fully resolved inputs for one demo run
#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub bucket: String,
    pub table: ResourceSpec,
    pub record: Record,
}

impl DemoPlan {
    /// Resolve a plan from config, failing on the first missing setting
    pub fn from_settings(settings: &DemoSettings) -> Result<Self, ConfigError> {
        let bucket = settings.bucket.clone().ok_or_else(|| {
            ConfigError::missing("demo.bucket", "Set it in the config file or pass --bucket.")
        })?;
        let table = settings.table.as_ref().map(|t| t.to_spec()).ok_or_else(|| {
            ConfigError::missing("demo.table", "Add a [demo.table] section or pass --table.")
        })?;
        let record = settings.record.clone().ok_or_else(|| {
            ConfigError::missing("demo.record", "Add a [demo.record] section or pass --item.")
        })?;

        Ok(Self {
            bucket,
            table,
            record,
        })
    }
}

/// Demo steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemoStep {
    ListObjects,
    CreateTable,
    InsertRecord,
}

impl std::fmt::Display for DemoStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoStep::ListObjects => write!(f, "list objects"),
            DemoStep::CreateTable => write!(f, "create table"),
            DemoStep::InsertRecord => write!(f, "insert record"),
        }
    }
}

/// Successful step payloads
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepOutput {
    Objects { objects: Vec<ObjectSummary> },
    TableReady,
    RecordInserted,
}

/// Outcome of a single step
#[derive(Debug)]
pub struct StepOutcome {
    pub step: DemoStep,
    pub target: String,
    pub result: Result<StepOutput, CoreError>,
}

/// Outcome of a whole run
#[derive(Debug, Default)]
pub struct DemoReport {
    pub steps: Vec<StepOutcome>,
}

impl DemoReport {
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.result.is_err())
    }

    fn record(&mut self, step: DemoStep, target: &str, result: Result<StepOutput, CoreError>) {
        match &result {
            Ok(_) => info!(%step, resource = target, "step succeeded"),
            Err(e) => warn!(%step, resource = target, error = %e, "step failed"),
        }
        self.steps.push(StepOutcome {
            step,
            target: target.to_string(),
            result,
        });
    }
}

/// Run the demo sequence against `client`
pub async fn run_demo<C: RemoteServiceClient + ?Sized>(
    client: &C,
    plan: &DemoPlan,
    wait: &WaitSettings,
    cancel: &CancellationToken,
    on_progress: Option<ProgressCallback>,
) -> DemoReport {
    let mut report = DemoReport::default();

    let listed = client
        .list_objects(&plan.bucket, &ListOptions::default())
        .await
        .map(|objects| StepOutput::Objects { objects });
    report.record(DemoStep::ListObjects, &plan.bucket, listed);

    let mut provisioner = ResourceProvisioner::new(client);
    if let Some(cb) = on_progress {
        provisioner = provisioner.with_progress(cb);
    }
    let created = provisioner
        .create_and_wait(&plan.table, wait.poll_interval(), wait.timeout(), cancel)
        .await
        .map(|_| StepOutput::TableReady);
    report.record(DemoStep::CreateTable, plan.table.name(), created);

    let inserted = client
        .put_record(plan.table.name(), &plan.record)
        .await
        .map(|_| StepOutput::RecordInserted);
    report.record(DemoStep::InsertRecord, plan.table.name(), inserted);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_plan_from_sample_settings() {
        let plan = DemoPlan::from_settings(&Config::sample().demo).unwrap();
        assert_eq!(plan.bucket, "my-cli-demo-bucket");
        assert_eq!(plan.table.name(), "MyTestTable");
        assert_eq!(plan.record["id"], "001");
    }

    #[test]
    fn test_plan_missing_bucket() {
        let mut settings = Config::sample().demo;
        settings.bucket = None;
        let err = DemoPlan::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("demo.bucket"));
    }

    #[test]
    fn test_plan_missing_record() {
        let mut settings = Config::sample().demo;
        settings.record = None;
        let err = DemoPlan::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("--item"));
    }
}
