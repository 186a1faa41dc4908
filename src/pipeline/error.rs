// ABOUTME: Pipeline error types with SNAFU pattern.
// ABOUTME: Wraps each step's error and exposes the error kind for callers.

use snafu::Snafu;

use crate::artifact::BuildError;
use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::deployment::{DeploymentFailed, LaunchError, MonitorError};
use crate::storage::PublishError;

/// Error that aborted a `prepare` or `deploy` phase.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PipelineError {
    #[snafu(display("{source}"))]
    Config { source: ConfigError },

    #[snafu(display("credential resolution failed: {source}"))]
    Credentials { source: CredentialError },

    #[snafu(display("failed to remove old build directory: {source}"))]
    Cleanup { source: BuildError },

    #[snafu(display("failed to build artifact: {source}"))]
    Build { source: BuildError },

    #[snafu(display("{source}"))]
    Publish { source: PublishError },

    #[snafu(display("{source}"))]
    Launch { source: LaunchError },

    #[snafu(display("{source}"))]
    Monitor { source: MonitorError },

    #[snafu(display("{source}"))]
    DeploymentFailed { source: DeploymentFailed },

    #[snafu(display("cancelled before {step}; no deployment was created"))]
    Cancelled { step: &'static str },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineErrorKind {
    /// A required configuration field is missing.
    Configuration,
    /// No credential provider produced credentials.
    Credential,
    /// A packaging command failed.
    Build,
    /// The artifact could not be opened for upload.
    ArtifactNotFound,
    /// The upload to object storage failed.
    Publish,
    /// The deployment service rejected the deployment.
    Launch,
    /// A status fetch failed, or monitoring was stopped.
    Monitor,
    /// The deployment ended in a status other than `Succeeded`.
    DeploymentFailed,
    /// Stopped by the operator before a deployment was created.
    Cancelled,
}

impl PipelineError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> PipelineErrorKind {
        match self {
            PipelineError::Config { .. } => PipelineErrorKind::Configuration,
            PipelineError::Credentials { .. } => PipelineErrorKind::Credential,
            PipelineError::Cleanup { .. } | PipelineError::Build { .. } => {
                PipelineErrorKind::Build
            }
            PipelineError::Publish {
                source: PublishError::ArtifactNotFound(_),
            } => PipelineErrorKind::ArtifactNotFound,
            PipelineError::Publish { .. } => PipelineErrorKind::Publish,
            PipelineError::Launch { .. } => PipelineErrorKind::Launch,
            PipelineError::Monitor { .. } => PipelineErrorKind::Monitor,
            PipelineError::DeploymentFailed { .. } => PipelineErrorKind::DeploymentFailed,
            PipelineError::Cancelled { .. } => PipelineErrorKind::Cancelled,
        }
    }

    /// Returns the failed deployment's details if the rollout itself failed.
    pub fn deployment_failure(&self) -> Option<&DeploymentFailed> {
        match self {
            PipelineError::DeploymentFailed { source } => Some(source),
            _ => None,
        }
    }
}
