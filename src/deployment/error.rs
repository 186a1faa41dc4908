// ABOUTME: Error types for launching and monitoring deployments.
// ABOUTME: Separates service rejections, poll failures and failed outcomes.

use std::time::Duration;

use super::service::ErrorInformation;
use crate::types::{DeploymentId, DeploymentStatus};

/// A call to the deployment service failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{operation} failed: {reason}")]
    Request {
        operation: &'static str,
        reason: String,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },
}

impl ServiceError {
    pub fn request(operation: &'static str, reason: impl Into<String>) -> Self {
        ServiceError::Request {
            operation,
            reason: reason.into(),
        }
    }
}

/// The service rejected the create-deployment request.
#[derive(Debug, thiserror::Error)]
#[error("failed to create deployment for {application}/{group}: {source}")]
pub struct LaunchError {
    pub application: String,
    pub group: String,
    #[source]
    pub source: ServiceError,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// A status fetch failed; polling stops without retrying.
    #[error("failed to fetch status of deployment {deployment_id}: {source}")]
    StatusFetch {
        deployment_id: DeploymentId,
        source: ServiceError,
    },

    #[error("stopped monitoring deployment {deployment_id} (last status {last_status}); the deployment itself continues")]
    Cancelled {
        deployment_id: DeploymentId,
        last_status: DeploymentStatus,
    },

    #[error("deployment {deployment_id} still {last_status} after {}s; the deployment itself continues", waited.as_secs())]
    TimedOut {
        deployment_id: DeploymentId,
        last_status: DeploymentStatus,
        waited: Duration,
    },
}

/// The deployment reached a terminal status other than `Succeeded`.
///
/// Displays as the service's error message, else its error code, else the
/// bare status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DeploymentFailed {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    pub error_information: Option<ErrorInformation>,
    pub message: String,
}
