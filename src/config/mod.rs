// ABOUTME: Configuration types and loading for cdrelease.yml.
// ABOUTME: Parses the raw YAML surface; validation lives in the resolver.

mod env_value;
mod init;
mod resolve;

pub use env_value::{EnvValue, UnresolvedEnvValue};
pub use init::init_config;
pub use resolve::{BUILD_DIRECTORY, ConfigError, DeploymentConfig, RequiredField};

use crate::credentials::CredentialSpec;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "cdrelease.yml";
pub const CONFIG_FILENAME_ALT: &str = "cdrelease.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".cdrelease/config.yml";

/// Delay between two deployment status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration as written by the operator.
///
/// Required fields are optional here so that the resolver can report which
/// one is missing instead of a generic parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default)]
    pub application_name: Option<String>,

    #[serde(default)]
    pub deployment_group: Option<String>,

    #[serde(default)]
    pub s3_bucket: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub source_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_string: Option<String>,

    #[serde(default = "default_quiet_build")]
    pub quiet_build: bool,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub monitor_timeout: Option<Duration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_credentials: Option<CredentialSpec>,
}

fn default_quiet_build() -> bool {
    true
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            application_name: None,
            deployment_group: None,
            s3_bucket: None,
            region: None,
            source_path: None,
            exclude_string: None,
            quiet_build: default_quiet_build(),
            poll_interval: default_poll_interval(),
            monitor_timeout: None,
            description: None,
            aws_credentials: None,
        }
    }
}

impl RawConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn template() -> Self {
        RawConfig {
            application_name: Some("my-app".to_string()),
            deployment_group: Some("production".to_string()),
            s3_bucket: Some("my-release-bucket/my-app".to_string()),
            region: Some("us-east-1".to_string()),
            source_path: Some(".".to_string()),
            exclude_string: Some(".git/*".to_string()),
            aws_credentials: Some(CredentialSpec::default()),
            ..RawConfig::default()
        }
    }
}
