// ABOUTME: AWS CodeDeploy implementation of the deployment service.
// ABOUTME: Maps CreateDeployment/GetDeployment onto the pipeline's types.

use async_trait::async_trait;
use aws_sdk_codedeploy::Client;
use aws_sdk_codedeploy::config::{BehaviorVersion, Region};
use aws_sdk_codedeploy::error::DisplayErrorContext;
use aws_sdk_codedeploy::types::{
    BundleType as SdkBundleType, RevisionLocation, RevisionLocationType, S3Location,
};

use super::error::ServiceError;
use super::service::{
    BundleType, CreateDeploymentRequest, DeploymentJob, DeploymentService, ErrorInformation,
};
use crate::credentials::ResolvedCredentials;
use crate::types::{DeploymentId, DeploymentStatus};

const CREATE_DEPLOYMENT: &str = "CreateDeployment";
const GET_DEPLOYMENT: &str = "GetDeployment";

/// CodeDeploy client bound to one region and credential set.
#[derive(Debug, Clone)]
pub struct CodeDeployService {
    client: Client,
}

impl CodeDeployService {
    pub fn new(region: &str, credentials: &ResolvedCredentials) -> Self {
        let config = aws_sdk_codedeploy::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials.credentials().clone())
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }
}

fn revision_location(request: &CreateDeploymentRequest) -> RevisionLocation {
    let bundle_type = match request.revision.bundle_type {
        BundleType::Zip => SdkBundleType::Zip,
    };

    let s3_location = S3Location::builder()
        .bucket(&request.revision.bucket)
        .key(&request.revision.key)
        .bundle_type(bundle_type)
        .set_e_tag(request.revision.e_tag.clone())
        .build();

    RevisionLocation::builder()
        .revision_type(RevisionLocationType::S3)
        .s3_location(s3_location)
        .build()
}

#[async_trait]
impl DeploymentService for CodeDeployService {
    async fn create_deployment(
        &self,
        request: &CreateDeploymentRequest,
    ) -> Result<DeploymentId, ServiceError> {
        let output = self
            .client
            .create_deployment()
            .application_name(&request.application_name)
            .deployment_group_name(&request.deployment_group_name)
            .revision(revision_location(request))
            .description(&request.description)
            .send()
            .await
            .map_err(|e| ServiceError::request(CREATE_DEPLOYMENT, DisplayErrorContext(e).to_string()))?;

        output
            .deployment_id()
            .map(DeploymentId::new)
            .ok_or(ServiceError::MissingField {
                operation: CREATE_DEPLOYMENT,
                field: "deploymentId",
            })
    }

    async fn get_deployment(&self, id: &DeploymentId) -> Result<DeploymentJob, ServiceError> {
        let output = self
            .client
            .get_deployment()
            .deployment_id(id.as_str())
            .send()
            .await
            .map_err(|e| ServiceError::request(GET_DEPLOYMENT, DisplayErrorContext(e).to_string()))?;

        let info = output.deployment_info();
        let status = info
            .and_then(|info| info.status())
            .map(|status| DeploymentStatus::parse(status.as_str()))
            .unwrap_or_else(|| DeploymentStatus::Other("Unknown".to_string()));
        let error_information = info
            .and_then(|info| info.error_information())
            .map(|error| ErrorInformation {
                code: error.code().map(|code| code.as_str().to_string()),
                message: error.message().map(str::to_string),
            });

        Ok(DeploymentJob::new(id.clone(), status, error_information))
    }
}
