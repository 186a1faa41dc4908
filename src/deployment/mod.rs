// ABOUTME: Deployment service collaborator, launcher and status monitor.
// ABOUTME: Submits a revision for rollout and polls it to a terminal status.

mod codedeploy;
mod error;
mod launcher;
mod monitor;
mod service;

pub use codedeploy::CodeDeployService;
pub use error::{DeploymentFailed, LaunchError, MonitorError, ServiceError};
pub use launcher::{DeploymentLauncher, default_description};
pub use monitor::{DeploymentMonitor, MonitorSettings, evaluate_outcome};
pub use service::{
    BundleType, CreateDeploymentRequest, DeploymentJob, DeploymentService, ErrorInformation,
    RevisionDescriptor,
};
