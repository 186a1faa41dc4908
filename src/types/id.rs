// ABOUTME: Opaque identifier assigned by the deployment service.
// ABOUTME: Newtype so deployment ids are never confused with other strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a deployment, e.g. `d-ABCDEF123`.
#[must_use = "IDs reference deployments and should not be ignored"]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(String);

impl DeploymentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeploymentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
