// ABOUTME: Credential settings as written in the `awsCredentials` config block.
// ABOUTME: A mode selects which provider strategies are attempted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::EnvValue;

/// Which credential providers to attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Literal key pair from the config.
    #[serde(alias = "Explicit")]
    Explicit,
    /// Named profile from the shared credentials file.
    #[serde(alias = "Shared")]
    Shared,
    /// Prefixed process environment variables.
    #[serde(alias = "Environment")]
    Environment,
    /// Explicit, then shared, then environment.
    #[default]
    #[serde(alias = "Standard")]
    Standard,
}

impl CredentialMode {
    pub fn includes_explicit(&self) -> bool {
        matches!(self, Self::Explicit | Self::Standard)
    }

    pub fn includes_shared(&self) -> bool {
        matches!(self, Self::Shared | Self::Standard)
    }

    pub fn includes_environment(&self) -> bool {
        matches!(self, Self::Environment | Self::Standard)
    }
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Explicit => "explicit",
            Self::Shared => "shared",
            Self::Environment => "environment",
            Self::Standard => "standard",
        };
        f.write_str(name)
    }
}

/// Literal key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitCredentials {
    #[serde(alias = "awsAccessKey")]
    pub access_key_id: EnvValue,

    #[serde(alias = "awsSecretKey")]
    pub secret_access_key: EnvValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<EnvValue>,
}

/// The `awsCredentials` block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSpec {
    #[serde(default)]
    pub mode: CredentialMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<ExplicitCredentials>,

    /// Profile name in the shared credentials file; the default profile when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<String>,

    /// Environment variable prefix, `AWS` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}
