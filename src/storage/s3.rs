// ABOUTME: Amazon S3 backend for artifact uploads via object_store.
// ABOUTME: Builds a per-bucket client from the region and resolved credentials.

use async_trait::async_trait;
use bytes::Bytes;
use object_store::ObjectStore;
use object_store::PutPayload;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use tracing::{debug, info};

use super::{ObjectStorage, StorageError, UploadReceipt};
use crate::credentials::ResolvedCredentials;

/// S3 uploads signed with one resolved credential set.
#[derive(Debug, Clone)]
pub struct S3Storage {
    region: String,
    credentials: ResolvedCredentials,
}

impl S3Storage {
    pub fn new(region: impl Into<String>, credentials: ResolvedCredentials) -> Self {
        Self {
            region: region.into(),
            credentials,
        }
    }

    fn client(&self, bucket: &str) -> Result<AmazonS3, StorageError> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&self.region)
            .with_access_key_id(self.credentials.access_key_id())
            .with_secret_access_key(self.credentials.secret_access_key());

        if let Some(token) = self.credentials.session_token() {
            builder = builder.with_token(token);
        }

        builder
            .build()
            .map_err(|e| StorageError::Client(e.to_string()))
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
    ) -> Result<UploadReceipt, StorageError> {
        let store = self.client(bucket)?;
        let location = object_path(key)?;

        debug!(bucket, key, size = body.len(), "uploading object");
        let result = store
            .put(&location, PutPayload::from(body))
            .await
            .map_err(|e| StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        info!(bucket, key, e_tag = ?result.e_tag, "object uploaded");
        Ok(UploadReceipt {
            key: location.to_string(),
            e_tag: result.e_tag,
        })
    }
}

/// Parse `key` the way the store will write it.
fn object_path(key: &str) -> Result<ObjectPath, StorageError> {
    ObjectPath::parse(key).map_err(|e| StorageError::InvalidKey {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
