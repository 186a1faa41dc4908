// ABOUTME: Submits a deployment of the uploaded artifact.
// ABOUTME: Builds the S3 zip revision descriptor and returns the created job.

use tracing::info;

use super::error::LaunchError;
use super::service::{
    BundleType, CreateDeploymentRequest, DeploymentJob, DeploymentService, RevisionDescriptor,
};
use crate::config::DeploymentConfig;
use crate::storage::ArtifactUploadResult;
use crate::types::DeploymentStatus;

/// Description sent when the config does not set one.
pub fn default_description() -> String {
    format!(
        "Deployment via cdrelease from {}",
        gethostname::gethostname().to_string_lossy()
    )
}

pub struct DeploymentLauncher<'a> {
    service: &'a dyn DeploymentService,
}

impl<'a> DeploymentLauncher<'a> {
    pub fn new(service: &'a dyn DeploymentService) -> Self {
        Self { service }
    }

    pub fn request(
        config: &DeploymentConfig,
        upload: &ArtifactUploadResult,
    ) -> CreateDeploymentRequest {
        CreateDeploymentRequest {
            application_name: config.application_name().to_string(),
            deployment_group_name: config.deployment_group().to_string(),
            revision: RevisionDescriptor {
                bucket: upload.bucket.clone(),
                key: upload.key.clone(),
                e_tag: upload.e_tag.clone(),
                bundle_type: BundleType::Zip,
            },
            description: config
                .description()
                .map(str::to_string)
                .unwrap_or_else(default_description),
        }
    }

    /// Submit one deployment request.
    ///
    /// The create call only returns an id, so the job starts out `Created`.
    pub async fn launch(
        &self,
        config: &DeploymentConfig,
        upload: &ArtifactUploadResult,
    ) -> Result<DeploymentJob, LaunchError> {
        let request = Self::request(config, upload);
        let deployment_id =
            self.service
                .create_deployment(&request)
                .await
                .map_err(|source| LaunchError {
                    application: request.application_name.clone(),
                    group: request.deployment_group_name.clone(),
                    source,
                })?;

        info!(
            deployment_id = %deployment_id,
            application = %request.application_name,
            group = %request.deployment_group_name,
            "deployment created"
        );

        Ok(DeploymentJob::new(
            deployment_id,
            DeploymentStatus::Created,
            None,
        ))
    }
}
