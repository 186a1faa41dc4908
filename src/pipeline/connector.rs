// ABOUTME: Factory for the cloud backends used by the deploy phase.
// ABOUTME: Clients are created per invocation from the resolved credentials.

use crate::credentials::ResolvedCredentials;
use crate::deployment::{CodeDeployService, DeploymentService};
use crate::storage::{ObjectStorage, S3Storage};

/// Creates backend clients once credentials are known.
pub trait Connector: Send + Sync {
    fn object_storage(&self, region: &str, credentials: &ResolvedCredentials)
    -> Box<dyn ObjectStorage>;

    fn deployment_service(
        &self,
        region: &str,
        credentials: &ResolvedCredentials,
    ) -> Box<dyn DeploymentService>;
}

/// Amazon S3 plus AWS CodeDeploy.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsConnector;

impl AwsConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for AwsConnector {
    fn object_storage(
        &self,
        region: &str,
        credentials: &ResolvedCredentials,
    ) -> Box<dyn ObjectStorage> {
        Box::new(S3Storage::new(region, credentials.clone()))
    }

    fn deployment_service(
        &self,
        region: &str,
        credentials: &ResolvedCredentials,
    ) -> Box<dyn DeploymentService> {
        Box::new(CodeDeployService::new(region, credentials))
    }
}
