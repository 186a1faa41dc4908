// ABOUTME: Deployment service trait and the request/response types it uses.
// ABOUTME: Kept backend-neutral so tests can script status sequences.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::ServiceError;
use crate::types::{DeploymentId, DeploymentStatus};

/// Archive format of a revision stored in object storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Zip,
}

/// Reference to deployable content: always an object-storage artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionDescriptor {
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
    pub bundle_type: BundleType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeploymentRequest {
    pub application_name: String,
    pub deployment_group_name: String,
    pub revision: RevisionDescriptor,
    pub description: String,
}

/// Structured failure detail reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorInformation {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: Some(message.into()),
        }
    }
}

/// A deployment as last reported by the service. Never mutated locally;
/// a newer view comes from fetching again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentJob {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_information: Option<ErrorInformation>,
    pub observed_at: DateTime<Utc>,
}

impl DeploymentJob {
    pub fn new(
        deployment_id: DeploymentId,
        status: DeploymentStatus,
        error_information: Option<ErrorInformation>,
    ) -> Self {
        Self {
            deployment_id,
            status,
            error_information,
            observed_at: Utc::now(),
        }
    }

    /// Error message if the service supplied one.
    pub fn error_message(&self) -> Option<&str> {
        self.error_information
            .as_ref()
            .and_then(|info| info.message.as_deref())
    }
}

/// Deployment service operations used by the pipeline.
#[async_trait]
pub trait DeploymentService: Send + Sync {
    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<DeploymentId, ServiceError>;

    async fn get_deployment(&self, id: &DeploymentId) -> Result<DeploymentJob, ServiceError>;
}
