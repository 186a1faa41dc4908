// ABOUTME: Status command implementation.
// ABOUTME: Fetches one deployment from CodeDeploy and prints its status.

use std::path::Path;

use cdrelease::config::{DeploymentConfig, RawConfig};
use cdrelease::credentials::CredentialChainResolver;
use cdrelease::error::Result;
use cdrelease::output::{Console, Output, OutputMode};
use cdrelease::pipeline::{AwsConnector, Connector};
use cdrelease::types::DeploymentId;

/// Print the current status of `deployment_id`.
pub async fn status(
    raw: RawConfig,
    data_dir: &Path,
    deployment_id: DeploymentId,
    output: Output,
) -> Result<()> {
    let config = DeploymentConfig::resolve(&raw, data_dir)?;
    let credentials = CredentialChainResolver::new()
        .resolve(config.credentials(), config.region())
        .await?;

    let service = AwsConnector::new().deployment_service(config.region(), &credentials);
    let job = service.get_deployment(&deployment_id).await?;

    if output.mode() == OutputMode::Json {
        if let Ok(value) = serde_json::to_value(&job) {
            output.log(&value);
        }
        return Ok(());
    }

    output.success(&format!("{}: {}", job.deployment_id, job.status));
    if let Some(message) = job.error_message() {
        output.warning(message);
    }
    Ok(())
}
