// ABOUTME: Object storage collaborator and artifact publishing.
// ABOUTME: Uploads the built artifact and returns its integrity tag.

mod publisher;
mod s3;

pub use publisher::{ArtifactUploadResult, PublishError, publish};
pub use s3::S3Storage;

use async_trait::async_trait;
use bytes::Bytes;

/// What the object store reported for a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Key the object was written under, as normalized by the store.
    pub key: String,
    pub e_tag: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to configure object storage client: {0}")]
    Client(String),

    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("upload to {bucket}/{key} failed: {reason}")]
    Upload {
        bucket: String,
        key: String,
        reason: String,
    },
}

/// Object storage operations used by the pipeline.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `body` at `key` in `bucket` in a single call.
    async fn upload(&self, bucket: &str, key: &str, body: Bytes)
    -> Result<UploadReceipt, StorageError>;
}
