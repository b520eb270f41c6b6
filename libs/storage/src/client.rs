//! S3-backed object storage client

use anyhow::Result;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::time::Duration;
use tracing::info;

use crate::config::StorageConfig;

/// Client for the object store holding photos, assets and snapshots
#[derive(Clone)]
pub struct ObjectStorage {
    client: Client,
    bucket: String,
    cdn_url: String,
    signed_url_expiry: u64,
}

impl ObjectStorage {
    pub fn new(client: Client, config: &StorageConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            cdn_url: config.cdn_url.trim_end_matches('/').to_string(),
            signed_url_expiry: config.signed_url_expiry,
        }
    }

    /// Public URL of a stored object, served through the CDN host
    pub fn cdn_url(&self, location: &str) -> String {
        format!("{}/{}", self.cdn_url, location.trim_start_matches('/'))
    }

    /// Upload a file body under `key` and return the stored location
    pub async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to upload object {}: {}", key, e))?;

        info!("Uploaded object to {}", key);
        Ok(key.to_string())
    }

    /// Copy an already stored object to `dest_key` within the bucket
    pub async fn copy(&self, source_key: &str, dest_key: &str) -> Result<String> {
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, source_key))
            .key(dest_key)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!("Failed to copy object {} to {}: {}", source_key, dest_key, e)
            })?;

        info!("Copied object {} to {}", source_key, dest_key);
        Ok(dest_key.to_string())
    }

    /// Generate a time-limited download URL for a stored object
    ///
    /// Client-facing delivery always goes through [`cdn_url`]; no HTTP
    /// route hands out presigned URLs. This stays for direct bucket
    /// access against objects the CDN does not front.
    ///
    /// [`cdn_url`]: ObjectStorage::cdn_url
    pub async fn signed_url(&self, key: &str) -> Result<String> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(self.signed_url_expiry))
            .map_err(|e| anyhow::anyhow!("Invalid signed URL expiry: {}", e))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to sign URL for object {}: {}", key, e))?;

        Ok(request.uri().to_string())
    }
}
