//! Spinner output for readiness waits
//!
//! Wraps the provisioner's progress callback in an indicatif spinner. The
//! spinner draws to stderr and hides itself when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use provisionctl_core::{ProgressCallback, ProgressEvent, ResourceStatus};
use std::time::Duration;

/// A spinner plus the callback that drives it
pub struct WaitSpinner {
    bar: ProgressBar,
}

impl WaitSpinner {
    pub fn new(message: String) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_message(message);
        Self { bar }
    }

    /// Progress callback to hand to the provisioner
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Box::new(move |event: ProgressEvent| match &event {
            ProgressEvent::Submitted { name } => {
                bar.set_message(format!("Table {} submitted", name));
            }
            ProgressEvent::Polling { name, status, .. } => {
                bar.set_message(format!("Table {}: {}", name, format_status(*status)));
            }
            ProgressEvent::Ready { name, elapsed } => {
                bar.finish_with_message(format!(
                    "Table {}: {} after {}s",
                    name,
                    format_status(ResourceStatus::Active),
                    elapsed.as_secs()
                ));
            }
            ProgressEvent::Failed { name, error } => {
                bar.abandon_with_message(format!("Table {} failed: {}", name, error));
            }
        })
    }

    /// Stop the spinner if no terminal event did
    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Format a status for display with a status icon
pub fn format_status(status: ResourceStatus) -> String {
    match status {
        ResourceStatus::Active => format!("\u{2713} {}", status),
        ResourceStatus::Failed => format!("\u{2717} {}", status),
        ResourceStatus::Creating => format!("\u{21bb} {}", status),
        ResourceStatus::NotFound => format!("? {}", status),
    }
}
