//! The `run` command: list a bucket, create a table, insert a record

use colored::Colorize;
use provisionctl_core::config::{DemoSettings, TableSettings};
use provisionctl_core::{
    AttributeType, CancellationToken, DemoPlan, DemoReport, KeyAttribute, StepOutcome, StepOutput,
    run_demo,
};
use serde::Serialize;
use tracing::info;

use crate::cli::{OutputFormat, RunArgs};
use crate::commands::item::parse_record;
use crate::commands::wait::WaitSpinner;
use crate::connection::ConnectionManager;
use crate::error::{ProvisionCtlError, Result as CliResult};
use crate::output::print_output;

/// One step as printed in structured output
#[derive(Debug, Serialize)]
struct StepView<'a> {
    step: String,
    target: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a StepOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> From<&'a StepOutcome> for StepView<'a> {
    fn from(outcome: &'a StepOutcome) -> Self {
        Self {
            step: outcome.step.to_string(),
            target: &outcome.target,
            ok: outcome.result.is_ok(),
            output: outcome.result.as_ref().ok(),
            error: outcome.result.as_ref().err().map(|e| e.to_string()),
        }
    }
}

pub async fn handle_run(
    args: &RunArgs,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
    cancel: &CancellationToken,
) -> CliResult<()> {
    // Everything resolvable locally is checked before touching the network
    let settings = apply_overrides(&conn_mgr.config.demo, args)?;
    let plan = DemoPlan::from_settings(&settings)?;
    let wait = args.wait.resolve(&conn_mgr.config.wait);

    let client = conn_mgr.create_client().await?;
    info!(
        bucket = %plan.bucket,
        table = plan.table.name(),
        "running demo"
    );

    let spinner = WaitSpinner::new(format!("Listing bucket {}", plan.bucket));
    let report = run_demo(&client, &plan, &wait, cancel, Some(spinner.callback())).await;
    spinner.finish();

    print_report(&report, output_format)?;

    if args.strict && !report.is_success() {
        return Err(ProvisionCtlError::StepsFailed {
            failed: report.failures().count(),
            total: report.steps.len(),
        });
    }
    Ok(())
}

/// Layer `--bucket/--table/--item` over the `[demo]` config section
fn apply_overrides(configured: &DemoSettings, args: &RunArgs) -> CliResult<DemoSettings> {
    let mut settings = configured.clone();

    if let Some(bucket) = &args.bucket {
        settings.bucket = Some(bucket.clone());
    }

    if let Some(table) = &args.table {
        settings.table = Some(match settings.table.take() {
            Some(existing) => TableSettings {
                name: table.clone(),
                ..existing
            },
            None => TableSettings {
                name: table.clone(),
                key_schema: vec![KeyAttribute::partition("id", AttributeType::String)],
                throughput: None,
            },
        });
    }

    if let Some(item) = &args.item {
        settings.record = Some(parse_record(item)?);
    }

    Ok(settings)
}

fn print_report(report: &DemoReport, output_format: OutputFormat) -> CliResult<()> {
    if output_format.is_structured() {
        let steps: Vec<StepView> = report.steps.iter().map(StepView::from).collect();
        print_output(&steps, output_format)?;
        return Ok(());
    }

    for outcome in &report.steps {
        match &outcome.result {
            Ok(output) => println!(
                "{} {} ({}): {}",
                "\u{2713}".green(),
                outcome.step,
                outcome.target,
                describe_output(output)
            ),
            Err(e) => println!(
                "{} {} ({}): {}",
                "\u{2717}".red(),
                outcome.step,
                outcome.target,
                e
            ),
        }
        if let Ok(StepOutput::Objects { objects }) = &outcome.result {
            for object in objects {
                println!("    {}", object.key);
            }
        }
    }
    Ok(())
}

fn describe_output(output: &StepOutput) -> String {
    match output {
        StepOutput::Objects { objects } if objects.is_empty() => "bucket is empty".to_string(),
        StepOutput::Objects { objects } => format!("{} objects", objects.len()),
        StepOutput::TableReady => "table is ACTIVE".to_string(),
        StepOutput::RecordInserted => "record inserted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::WaitArgs;
    use provisionctl_core::config::Config;

    fn args() -> RunArgs {
        RunArgs {
            bucket: None,
            table: None,
            item: None,
            strict: false,
            wait: WaitArgs::default(),
        }
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let demo = Config::sample().demo;
        assert_eq!(apply_overrides(&demo, &args()).unwrap(), demo);
    }

    #[test]
    fn test_table_override_keeps_configured_schema() {
        let demo = Config::sample().demo;
        let settings = apply_overrides(
            &demo,
            &RunArgs {
                table: Some("Other".to_string()),
                ..args()
            },
        )
        .unwrap();

        let table = settings.table.unwrap();
        assert_eq!(table.name, "Other");
        assert_eq!(table.key_schema, demo.table.unwrap().key_schema);
    }

    #[test]
    fn test_table_override_without_config_defaults_to_id_key() {
        let settings = apply_overrides(
            &DemoSettings::default(),
            &RunArgs {
                table: Some("Fresh".to_string()),
                ..args()
            },
        )
        .unwrap();

        let spec = settings.table.unwrap().to_spec();
        assert_eq!(spec.partition_key().unwrap().name, "id");
    }

    #[test]
    fn test_item_override_must_be_object() {
        let result = apply_overrides(
            &Config::sample().demo,
            &RunArgs {
                item: Some("42".to_string()),
                ..args()
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_describe_output() {
        assert_eq!(
            describe_output(&StepOutput::Objects { objects: vec![] }),
            "bucket is empty"
        );
        assert_eq!(describe_output(&StepOutput::TableReady), "table is ACTIVE");
    }
}
