// ABOUTME: Validation of raw configuration and derivation of computed fields.
// ABOUTME: Produces an immutable DeploymentConfig or names the missing field.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use super::RawConfig;
use crate::credentials::CredentialSpec;
use crate::types::BucketLocation;

/// Name of the directory (relative to the data dir) holding the artifact.
pub const BUILD_DIRECTORY: &str = "aws_build";

const ARTIFACT_SUFFIX: &str = "release_artifact.zip";

/// The five fields that must be present before anything else is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    ApplicationName,
    DeploymentGroup,
    S3Bucket,
    Region,
    SourcePath,
}

impl RequiredField {
    /// Every required field, in validation order.
    pub const ALL: [RequiredField; 5] = [
        RequiredField::ApplicationName,
        RequiredField::DeploymentGroup,
        RequiredField::S3Bucket,
        RequiredField::Region,
        RequiredField::SourcePath,
    ];

    /// Key as written in the config file.
    pub fn key(&self) -> &'static str {
        match self {
            RequiredField::ApplicationName => "applicationName",
            RequiredField::DeploymentGroup => "deploymentGroup",
            RequiredField::S3Bucket => "s3Bucket",
            RequiredField::Region => "region",
            RequiredField::SourcePath => "sourcePath",
        }
    }

    fn value<'a>(&self, raw: &'a RawConfig) -> Option<&'a str> {
        let value = match self {
            RequiredField::ApplicationName => &raw.application_name,
            RequiredField::DeploymentGroup => &raw.deployment_group,
            RequiredField::S3Bucket => &raw.s3_bucket,
            RequiredField::Region => &raw.region,
            RequiredField::SourcePath => &raw.source_path,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequiredField::ApplicationName => "application-name",
            RequiredField::DeploymentGroup => "deployment-group",
            RequiredField::S3Bucket => "s3-bucket",
            RequiredField::Region => "region",
            RequiredField::SourcePath => "source-path",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} is undefined (set `{}` in the configuration)", field.key())]
    MissingField { field: RequiredField },

    #[error("s3-bucket `{value}` has no bucket name (expected `bucket[/prefix]`)")]
    MissingBucketName { value: String },
}

impl ConfigError {
    pub fn field(&self) -> RequiredField {
        match self {
            ConfigError::MissingField { field } => *field,
            ConfigError::MissingBucketName { .. } => RequiredField::S3Bucket,
        }
    }
}

/// Validated configuration with every derived field populated.
///
/// Only constructible through [`DeploymentConfig::resolve`], so derived fields
/// are never partially set.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    application_name: String,
    deployment_group: String,
    region: String,
    source_path: String,
    exclude_string: Option<String>,
    quiet_build: bool,
    s3_bucket: String,
    bucket: BucketLocation,
    artifact_name: String,
    artifact_path: PathBuf,
    absolute_artifact_path: PathBuf,
    artifact_key: String,
    data_dir: PathBuf,
    poll_interval: Duration,
    monitor_timeout: Option<Duration>,
    description: Option<String>,
    credentials: Option<CredentialSpec>,
}

impl DeploymentConfig {
    /// Validate `raw` and compute the derived fields against `data_dir`.
    ///
    /// Fields are checked in a fixed order and the first missing one is
    /// reported. No filesystem or network access happens here.
    pub fn resolve(raw: &RawConfig, data_dir: &Path) -> Result<Self, ConfigError> {
        let require = |field: RequiredField| {
            field
                .value(raw)
                .map(str::to_string)
                .ok_or(ConfigError::MissingField { field })
        };
        let application_name = require(RequiredField::ApplicationName)?;
        let deployment_group = require(RequiredField::DeploymentGroup)?;
        let s3_bucket = require(RequiredField::S3Bucket)?;
        let region = require(RequiredField::Region)?;
        let source_path = require(RequiredField::SourcePath)?;

        let bucket = BucketLocation::parse(&s3_bucket);
        if bucket.name().trim().is_empty() {
            return Err(ConfigError::MissingBucketName { value: s3_bucket });
        }
        let artifact_name = format!("{application_name}_{deployment_group}_{ARTIFACT_SUFFIX}");
        let artifact_path = Path::new(BUILD_DIRECTORY).join(&artifact_name);
        let absolute_artifact_path = data_dir.join(&artifact_path);
        let artifact_key = bucket.key_for(&artifact_name);

        Ok(Self {
            application_name,
            deployment_group,
            region,
            source_path,
            exclude_string: raw
                .exclude_string
                .clone()
                .filter(|s| !s.trim().is_empty()),
            quiet_build: raw.quiet_build,
            s3_bucket,
            bucket,
            artifact_name,
            artifact_path,
            absolute_artifact_path,
            artifact_key,
            data_dir: data_dir.to_path_buf(),
            poll_interval: raw.poll_interval,
            monitor_timeout: raw.monitor_timeout,
            description: raw.description.clone(),
            credentials: raw.aws_credentials.clone(),
        })
    }

    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    pub fn deployment_group(&self) -> &str {
        &self.deployment_group
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    /// Space-separated exclude patterns, passed to the archiver verbatim.
    pub fn exclude_string(&self) -> Option<&str> {
        self.exclude_string.as_deref()
    }

    pub fn quiet_build(&self) -> bool {
        self.quiet_build
    }

    /// The raw `bucket[/prefix]` value.
    pub fn s3_bucket(&self) -> &str {
        &self.s3_bucket
    }

    pub fn bucket_name(&self) -> &str {
        self.bucket.name()
    }

    pub fn bucket_prefix(&self) -> &str {
        self.bucket.prefix()
    }

    pub fn build_directory(&self) -> &str {
        BUILD_DIRECTORY
    }

    pub fn artifact_name(&self) -> &str {
        &self.artifact_name
    }

    /// Artifact path relative to the data directory.
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn absolute_artifact_path(&self) -> &Path {
        &self.absolute_artifact_path
    }

    pub fn artifact_key(&self) -> &str {
        &self.artifact_key
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn monitor_timeout(&self) -> Option<Duration> {
        self.monitor_timeout
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Credential settings, `None` when the config has no `awsCredentials`.
    pub fn credentials(&self) -> Option<&CredentialSpec> {
        self.credentials.as_ref()
    }
}
