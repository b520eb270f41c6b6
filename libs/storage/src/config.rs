//! Object storage configuration

use std::env;

/// Storage configuration struct
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bucket that holds every uploaded object
    pub bucket: String,
    /// Base URL of the CDN distribution in front of the bucket
    pub cdn_url: String,
    /// Lifetime of signed download URLs, in seconds
    pub signed_url_expiry: u64,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STORAGE_BUCKET`: Bucket name (default: artisan-photos)
    /// - `STORAGE_CDN_URL`: CDN base URL (default: the bucket's S3 URL)
    /// - `STORAGE_SIGNED_URL_EXPIRY`: Signed URL lifetime in seconds (default: 60000)
    pub fn from_env() -> Self {
        let bucket =
            env::var("STORAGE_BUCKET").unwrap_or_else(|_| "artisan-photos".to_string());

        let cdn_url = env::var("STORAGE_CDN_URL")
            .unwrap_or_else(|_| format!("https://{}.s3.amazonaws.com", bucket));

        let signed_url_expiry = env::var("STORAGE_SIGNED_URL_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60000);

        Self {
            bucket,
            cdn_url,
            signed_url_expiry,
        }
    }
}
