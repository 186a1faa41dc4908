// ABOUTME: Application-wide error types for cdrelease.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::deployment::ServiceError;
use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("credential resolution failed: {0}")]
    Credentials(#[from] CredentialError),

    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
