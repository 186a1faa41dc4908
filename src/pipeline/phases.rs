// ABOUTME: The two public phases of a release: prepare and deploy.
// ABOUTME: Each phase is a linear sequence of steps that stops at the first error.

use std::path::PathBuf;
use std::sync::Arc;

use snafu::{ResultExt, ensure};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use super::connector::Connector;
use super::error::{
    BuildSnafu, CancelledSnafu, CleanupSnafu, ConfigSnafu, CredentialsSnafu, DeploymentFailedSnafu, LaunchSnafu,
    MonitorSnafu, PipelineError, PublishSnafu,
};
use super::state::{Prepared, Unprepared};
use crate::artifact::ArtifactBuilder;
use crate::config::{DeploymentConfig, RawConfig};
use crate::credentials::{CredentialChainResolver, ResolvedCredentials};
use crate::deployment::{
    DeploymentJob, DeploymentLauncher, DeploymentMonitor, MonitorSettings, evaluate_outcome,
};
use crate::diagnostics::{Diagnostics, Warning};
use crate::exec::CommandRunner;
use crate::output::Console;
use crate::storage::publish;

/// External collaborators shared by both phases.
#[derive(Clone)]
pub struct Collaborators {
    pub runner: Arc<dyn CommandRunner>,
    pub console: Arc<dyn Console>,
    pub connector: Arc<dyn Connector>,
}

/// Outcome of a successful `deploy`.
#[derive(Debug)]
pub struct DeploymentReport {
    pub job: DeploymentJob,
    pub warnings: Vec<Warning>,
}

/// A release pipeline, parameterized by its current state.
pub struct Pipeline<S> {
    collaborators: Collaborators,
    resolver: CredentialChainResolver,
    cancel: CancellationToken,
    state: S,
}

impl<S> Pipeline<S> {
    /// Stop at the next step boundary, or stop monitoring, when this token
    /// is cancelled.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn comment(&self, text: &str) {
        self.collaborators.console.comment(text);
    }

    fn log_job(&self, job: &DeploymentJob) {
        if let Ok(value) = serde_json::to_value(job) {
            self.collaborators.console.log(&value);
        }
    }

    /// Comment the error's message before handing it back to the caller.
    ///
    /// A failed deployment's message was already commented with its status.
    fn report<T>(&self, result: Result<T, PipelineError>) -> Result<T, PipelineError> {
        if let Err(e) = &result {
            let already_commented = e.deployment_failure().is_some_and(|failure| {
                failure
                    .error_information
                    .as_ref()
                    .and_then(|info| info.message.as_deref())
                    == Some(failure.message.as_str())
            });
            if !already_commented {
                self.comment(&format!("Error: {e}"));
            }
        }
        result
    }

    fn ensure_not_cancelled(&self, step: &'static str) -> Result<(), PipelineError> {
        ensure!(!self.cancel.is_cancelled(), CancelledSnafu { step });
        Ok(())
    }
}

impl Pipeline<Unprepared> {
    pub fn new(raw: RawConfig, data_dir: impl Into<PathBuf>, collaborators: Collaborators) -> Self {
        Pipeline {
            collaborators,
            resolver: CredentialChainResolver::new(),
            cancel: CancellationToken::new(),
            state: Unprepared {
                raw,
                data_dir: data_dir.into(),
            },
        }
    }

    pub fn with_credential_resolver(mut self, resolver: CredentialChainResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Validate configuration, resolve credentials once, and remove any stale
    /// build directory.
    #[instrument(skip(self))]
    pub async fn prepare(self) -> Result<Pipeline<Prepared>, PipelineError> {
        let result = self.prepare_steps().await;
        let (config, credentials) = self.report(result)?;

        Ok(Pipeline {
            collaborators: self.collaborators,
            resolver: self.resolver,
            cancel: self.cancel,
            state: Prepared {
                config,
                credentials,
            },
        })
    }

    async fn prepare_steps(&self) -> Result<(DeploymentConfig, ResolvedCredentials), PipelineError> {
        let config =
            DeploymentConfig::resolve(&self.state.raw, &self.state.data_dir).context(ConfigSnafu)?;

        let credentials = self
            .resolver
            .resolve(config.credentials(), config.region())
            .await
            .context(CredentialsSnafu)?;

        self.comment("Delete old artifact ...");
        ArtifactBuilder::new(self.collaborators.runner.as_ref())
            .remove_build_directory(&config)
            .await
            .context(CleanupSnafu)?;

        info!(
            application = config.application_name(),
            group = config.deployment_group(),
            credentials = credentials.source(),
            "prepared"
        );
        Ok((config, credentials))
    }
}

impl Pipeline<Prepared> {
    pub fn config(&self) -> &DeploymentConfig {
        &self.state.config
    }

    pub fn credentials(&self) -> &ResolvedCredentials {
        &self.state.credentials
    }

    /// Build, upload, launch and monitor one deployment.
    ///
    /// Succeeds only when the deployment ends `Succeeded`.
    #[instrument(skip(self), fields(application = self.state.config.application_name()))]
    pub async fn deploy(&self) -> Result<DeploymentReport, PipelineError> {
        let result = self.deploy_steps().await;
        self.report(result)
    }

    async fn deploy_steps(&self) -> Result<DeploymentReport, PipelineError> {
        let config = &self.state.config;
        let credentials = &self.state.credentials;
        let mut diag = Diagnostics::default();

        self.comment("Start deployment ...");

        self.ensure_not_cancelled("build")?;
        self.comment("Bundle artifact ...");
        ArtifactBuilder::new(self.collaborators.runner.as_ref())
            .build(config)
            .await
            .context(BuildSnafu)?;

        self.ensure_not_cancelled("upload")?;
        self.comment("Deploy to AWS ...");
        let storage = self
            .collaborators
            .connector
            .object_storage(config.region(), credentials);
        let upload = publish(config, storage.as_ref())
            .await
            .context(PublishSnafu)?;
        if upload.e_tag.is_none() {
            diag.warn(Warning::missing_e_tag(format!(
                "upload of s3://{}/{} returned no ETag; deploying without it",
                upload.bucket, upload.key
            )));
        }

        self.ensure_not_cancelled("launch")?;
        let service = self
            .collaborators
            .connector
            .deployment_service(config.region(), credentials);
        let created = DeploymentLauncher::new(service.as_ref())
            .launch(config, &upload)
            .await
            .context(LaunchSnafu)?;
        self.log_job(&created);

        let settings = MonitorSettings {
            poll_interval: config.poll_interval(),
            max_wait: config.monitor_timeout(),
        };
        let finished = DeploymentMonitor::new(service.as_ref(), settings)
            .with_cancellation(self.cancel.clone())
            .run_to_terminal(&created.deployment_id, |job| self.comment_status(job))
            .await
            .context(MonitorSnafu)?;

        self.comment_status(&finished);
        self.log_job(&finished);

        let job = evaluate_outcome(finished).context(DeploymentFailedSnafu)?;
        self.comment("Deployment successful");

        Ok(DeploymentReport {
            job,
            warnings: diag.drain(),
        })
    }

    fn comment_status(&self, job: &DeploymentJob) {
        self.comment(&format!("Status: {}", job.status));
        if let Some(message) = job.error_message() {
            self.comment(&format!("Error: {message}"));
        }
    }
}
