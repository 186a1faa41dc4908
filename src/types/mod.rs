// ABOUTME: Domain value types shared across the release pipeline.
// ABOUTME: Deployment identifiers, deployment status vocabulary, bucket locations.

mod bucket;
mod id;
mod status;

pub use bucket::{BucketLocation, join_key};
pub use id::DeploymentId;
pub use status::DeploymentStatus;
