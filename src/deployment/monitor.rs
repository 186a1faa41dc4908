// ABOUTME: Polls a deployment until the service reports a terminal status.
// ABOUTME: Unbounded by default; a cancellation token or deadline can stop it.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::{DeploymentFailed, MonitorError};
use super::service::{DeploymentJob, DeploymentService};
use crate::config::DEFAULT_POLL_INTERVAL;
use crate::types::DeploymentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Delay between two status fetches.
    pub poll_interval: Duration,
    /// Overall bound on monitoring; `None` polls until a terminal status.
    pub max_wait: Option<Duration>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: None,
        }
    }
}

pub struct DeploymentMonitor<'a> {
    service: &'a dyn DeploymentService,
    settings: MonitorSettings,
    cancel: CancellationToken,
}

impl<'a> DeploymentMonitor<'a> {
    pub fn new(service: &'a dyn DeploymentService, settings: MonitorSettings) -> Self {
        Self {
            service,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetch status until it is terminal and return the final job.
    ///
    /// `on_progress` is called for every non-terminal observation. A failed
    /// fetch ends monitoring immediately; it is not retried.
    pub async fn run_to_terminal<F>(
        &self,
        deployment_id: &DeploymentId,
        mut on_progress: F,
    ) -> Result<DeploymentJob, MonitorError>
    where
        F: FnMut(&DeploymentJob) + Send,
    {
        let started = Instant::now();
        let deadline = self.settings.max_wait.map(|wait| started + wait);

        loop {
            let job = self
                .service
                .get_deployment(deployment_id)
                .await
                .map_err(|source| MonitorError::StatusFetch {
                    deployment_id: deployment_id.clone(),
                    source,
                })?;

            if job.status.is_terminal() {
                debug!(deployment_id = %deployment_id, status = %job.status, "terminal status");
                return Ok(job);
            }

            debug!(deployment_id = %deployment_id, status = %job.status, "deployment in flight");
            on_progress(&job);

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Err(MonitorError::Cancelled {
                        deployment_id: deployment_id.clone(),
                        last_status: job.status.clone(),
                    });
                }
                _ = wait_until(deadline) => {
                    return Err(MonitorError::TimedOut {
                        deployment_id: deployment_id.clone(),
                        last_status: job.status.clone(),
                        waited: started.elapsed(),
                    });
                }
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Succeed only on exactly `Succeeded`; any other terminal status fails with
/// the service's error message, or the bare status when there is none.
pub fn evaluate_outcome(job: DeploymentJob) -> Result<DeploymentJob, DeploymentFailed> {
    if job.status.is_success() {
        return Ok(job);
    }

    let message = job
        .error_message()
        .or_else(|| {
            job.error_information
                .as_ref()
                .and_then(|info| info.code.as_deref())
        })
        .map(str::to_string)
        .unwrap_or_else(|| job.status.to_string());

    Err(DeploymentFailed {
        deployment_id: job.deployment_id,
        status: job.status,
        error_information: job.error_information,
        message,
    })
}
