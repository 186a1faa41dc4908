// ABOUTME: Uploads the built artifact to object storage.
// ABOUTME: Distinguishes a missing artifact from other I/O and upload failures.

use std::io::ErrorKind;
use std::path::PathBuf;

use bytes::Bytes;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use super::{ObjectStorage, StorageError};
use crate::config::DeploymentConfig;

/// Where the artifact was stored and the tag needed to deploy it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactUploadResult {
    pub bucket: String,
    pub key: String,
    pub e_tag: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("artifact not found at {} (was the build step skipped?)", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("failed to read artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Upload the artifact at `config.absolute_artifact_path()`.
///
/// The file is opened before any network call, so a missing artifact never
/// reaches the object store.
pub async fn publish(
    config: &DeploymentConfig,
    storage: &dyn ObjectStorage,
) -> Result<ArtifactUploadResult, PublishError> {
    let path = config.absolute_artifact_path();

    let mut file = tokio::fs::File::open(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => PublishError::ArtifactNotFound(path.to_path_buf()),
        _ => PublishError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    // One PUT, so the whole artifact is held in memory.
    let mut body = Vec::new();
    file.read_to_end(&mut body)
        .await
        .map_err(|source| PublishError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let receipt = storage
        .upload(config.bucket_name(), config.artifact_key(), Bytes::from(body))
        .await?;

    Ok(ArtifactUploadResult {
        bucket: config.bucket_name().to_string(),
        key: receipt.key,
        e_tag: receipt.e_tag,
    })
}
