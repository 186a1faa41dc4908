// ABOUTME: Pipeline state types for the type state pattern.
// ABOUTME: Each state carries exactly the data valid at that point.

use std::path::PathBuf;

use crate::config::{DeploymentConfig, RawConfig};
use crate::credentials::ResolvedCredentials;

/// Before `prepare`: raw configuration and the data directory.
/// Available actions: `prepare()`
#[derive(Debug, Clone)]
pub struct Unprepared {
    pub(crate) raw: RawConfig,
    pub(crate) data_dir: PathBuf,
}

/// After `prepare`: validated configuration and the credentials resolved for
/// this invocation. Credentials are written once here and only read after.
/// Available actions: `deploy()`
#[derive(Debug, Clone)]
pub struct Prepared {
    pub(crate) config: DeploymentConfig,
    pub(crate) credentials: ResolvedCredentials,
}
