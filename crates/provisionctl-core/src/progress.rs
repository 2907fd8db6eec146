//! Progress events emitted while provisioning
//!
//! The provisioner reports each step through an optional callback so the CLI
//! can drive a spinner. Library callers that don't care pass nothing.

use std::time::Duration;

use crate::resource::ResourceStatus;

/// Progress events emitted during create and wait
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Creation request accepted by the service
    Submitted { name: String },
    /// Polling iteration with current status
    Polling {
        name: String,
        status: ResourceStatus,
        elapsed: Duration,
    },
    /// Resource reached ACTIVE
    Ready { name: String, elapsed: Duration },
    /// Resource failed, or the wait gave up
    Failed { name: String, error: String },
}

/// Callback type for progress updates
pub type ProgressCallback = Box<dyn Fn(ProgressEvent) + Send + Sync>;

/// Helper to emit progress events
pub(crate) fn emit(callback: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}
