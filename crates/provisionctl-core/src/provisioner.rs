//! Create a remote resource and wait for it to become usable
//!
//! The provisioner issues exactly one creation request, then polls the
//! service at a fixed interval until the resource is `ACTIVE`, reaches
//! `FAILED`, the timeout elapses, or the caller cancels. It never retries and
//! never prints; every failure is logged and returned.
//!
//! # Example
//!
//! ```rust,ignore
//! use provisionctl_core::{AttributeType, ResourceProvisioner, ResourceSpec};
//! use std::time::Duration;
//!
//! let spec = ResourceSpec::builder("MyTestTable")
//!     .partition_key("id", AttributeType::String)
//!     .throughput(5, 5)
//!     .build()?;
//!
//! let provisioner = ResourceProvisioner::new(&client);
//! let mut handle = provisioner.create(&spec).await?;
//! provisioner
//!     .await_ready(&mut handle, Duration::from_secs(20), Duration::from_secs(500))
//!     .await?;
//! ```

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::client::RemoteServiceClient;
use crate::error::{CoreError, Result};
use crate::progress::{ProgressCallback, ProgressEvent, emit};
use crate::resource::{ResourceHandle, ResourceSpec, ResourceStatus};

/// Lower bound on the poll interval so a zero interval can't spin
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Creates resources and waits for them to converge
pub struct ResourceProvisioner<'a, C: RemoteServiceClient + ?Sized> {
    client: &'a C,
    on_progress: Option<ProgressCallback>,
}

impl<'a, C: RemoteServiceClient + ?Sized> ResourceProvisioner<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            on_progress: None,
        }
    }

    /// Attach a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Validate `spec` and submit a single creation request
    ///
    /// The returned handle does not imply the resource is usable yet; pass it
    /// to [`Self::await_ready`].
    pub async fn create(&self, spec: &ResourceSpec) -> Result<ResourceHandle> {
        if let Err(e) = spec.validate() {
            warn!(resource = spec.name(), error = %e, "rejecting invalid resource spec");
            return Err(e);
        }

        debug!(
            resource = spec.name(),
            keys = spec.key_schema().len(),
            provisioned = spec.throughput().is_some(),
            "submitting creation request"
        );

        if let Err(e) = self.client.submit_create(spec).await {
            error!(resource = spec.name(), error = %e, "creation request failed");
            emit(
                &self.on_progress,
                ProgressEvent::Failed {
                    name: spec.name().to_string(),
                    error: e.to_string(),
                },
            );
            return Err(e);
        }

        info!(resource = spec.name(), "creation request accepted");
        emit(
            &self.on_progress,
            ProgressEvent::Submitted {
                name: spec.name().to_string(),
            },
        );

        Ok(ResourceHandle::new(spec.name()))
    }

    /// Block until the resource is `ACTIVE`
    ///
    /// Returns immediately if the handle has already been observed ready.
    pub async fn await_ready(
        &self,
        handle: &mut ResourceHandle,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<()> {
        self.await_ready_cancellable(handle, poll_interval, timeout, &CancellationToken::new())
            .await
    }

    /// Same as [`Self::await_ready`], but stops early once `cancel` fires
    pub async fn await_ready_cancellable(
        &self,
        handle: &mut ResourceHandle,
        poll_interval: Duration,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if handle.is_ready() {
            trace!(resource = handle.name(), "handle already ready, skipping poll");
            return Ok(());
        }

        let interval = poll_interval.max(MIN_POLL_INTERVAL);
        let start = Instant::now();

        debug!(
            resource = handle.name(),
            ?interval,
            ?timeout,
            "waiting for resource to become active"
        );

        loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled(handle));
            }

            // A slow status call still counts against the deadline
            let remaining = timeout.saturating_sub(start.elapsed());
            let polled = tokio::select! {
                _ = cancel.cancelled() => return Err(self.cancelled(handle)),
                polled = tokio::time::timeout(remaining, self.client.get_status(handle.name())) => polled,
            };
            let status = match polled {
                Ok(Ok(status)) => status,
                Ok(Err(e)) => {
                    error!(resource = handle.name(), error = %e, "status poll failed");
                    self.emit_failed(handle, &e);
                    return Err(e);
                }
                Err(_) => return Err(self.timed_out(handle, timeout)),
            };
            let elapsed = start.elapsed();

            emit(
                &self.on_progress,
                ProgressEvent::Polling {
                    name: handle.name().to_string(),
                    status,
                    elapsed,
                },
            );

            match status {
                ResourceStatus::Active => {
                    handle.mark_ready();
                    info!(resource = handle.name(), ?elapsed, "resource is active");
                    emit(
                        &self.on_progress,
                        ProgressEvent::Ready {
                            name: handle.name().to_string(),
                            elapsed,
                        },
                    );
                    return Ok(());
                }
                ResourceStatus::Failed => {
                    let err = CoreError::ProvisioningFailed {
                        name: handle.name().to_string(),
                        reason: format!("service reported status {}", status),
                    };
                    error!(resource = handle.name(), "resource entered a failed state");
                    self.emit_failed(handle, &err);
                    return Err(err);
                }
                ResourceStatus::Creating | ResourceStatus::NotFound => {
                    trace!(resource = handle.name(), %status, ?elapsed, "not ready yet");
                }
            }

            if elapsed >= timeout {
                return Err(self.timed_out(handle, timeout));
            }

            // Never sleep past the deadline
            let pause = interval.min(timeout - elapsed);
            tokio::select! {
                _ = cancel.cancelled() => return Err(self.cancelled(handle)),
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }

    /// Submit `spec` and wait for the new resource
    pub async fn create_and_wait(
        &self,
        spec: &ResourceSpec,
        poll_interval: Duration,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<ResourceHandle> {
        let mut handle = self.create(spec).await?;
        self.await_ready_cancellable(&mut handle, poll_interval, timeout, cancel)
            .await?;
        Ok(handle)
    }

    fn cancelled(&self, handle: &ResourceHandle) -> CoreError {
        let err = CoreError::Cancelled {
            name: handle.name().to_string(),
        };
        info!(resource = handle.name(), "wait cancelled");
        self.emit_failed(handle, &err);
        err
    }

    fn timed_out(&self, handle: &ResourceHandle, timeout: Duration) -> CoreError {
        let err = CoreError::Timeout {
            name: handle.name().to_string(),
            timeout,
        };
        warn!(resource = handle.name(), ?timeout, "gave up waiting for resource");
        self.emit_failed(handle, &err);
        err
    }

    fn emit_failed(&self, handle: &ResourceHandle, err: &CoreError) {
        emit(
            &self.on_progress,
            ProgressEvent::Failed {
                name: handle.name().to_string(),
                error: err.to_string(),
            },
        );
    }
}
