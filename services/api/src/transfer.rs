//! Transfer coordination
//!
//! The coordinator owns both halves of a style transfer: `initiate`
//! resolves the source asset and target style and publishes one job on
//! the style's routing key; `complete` takes the worker's callback,
//! persists the resulting media, and pushes the socket notification to
//! the connection registered under the correlation token. Correlation
//! is carried entirely inside the job payload, so no state spans the
//! two calls except the token registry below.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::Utc;
use gateway::{SocketRegistry, TRANSFER_COMPLETED};
use queue::JobProducer;
use serde_json::Value;
use storage::ObjectStorage;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::media::{MediaType, MediaWithAccess, NewMedia};
use crate::models::transfer::{
    TransferCompletion, TransferJob, TransferPhotoRequest, TransferVideoRequest,
};
use crate::repositories::media::MediaRepository;
use crate::repositories::notification::NotificationRepository;
use crate::repositories::style::StyleRepository;

/// Transfer coordination configuration
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// How long a correlation token stays known to the registry
    pub token_ttl: Duration,
}

impl TransferConfig {
    /// Create a new TransferConfig from environment variables
    ///
    /// # Environment Variables
    /// - `TRANSFER_TOKEN_TTL`: registry entry lifetime in seconds (default: 3600)
    pub fn from_env() -> Self {
        let token_ttl = std::env::var("TRANSFER_TOKEN_TTL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600);

        Self {
            token_ttl: Duration::from_secs(token_ttl),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenState {
    Outstanding,
    Resolved,
}

/// TTL-bounded registry of correlation tokens
///
/// Tokens are minted by the client, so a completion carrying a token the
/// registry has never seen is trusted and recorded on first sight. Once
/// a token is resolved, further completions for it are rejected until
/// the entry expires. Expired entries are swept inline on every access.
pub struct TokenRegistry {
    ttl: Duration,
    entries: Mutex<HashMap<String, (TokenState, Instant)>>,
}

impl TokenRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record a token as outstanding when a transfer is dispatched
    pub fn begin(&self, token: &str) {
        let mut entries = self.entries.lock().expect("token registry lock poisoned");
        Self::sweep(&mut entries, self.ttl);
        entries.insert(token.to_string(), (TokenState::Outstanding, Instant::now()));
    }

    /// Resolve a token; returns false when it was already resolved
    pub fn resolve(&self, token: &str) -> bool {
        let mut entries = self.entries.lock().expect("token registry lock poisoned");
        Self::sweep(&mut entries, self.ttl);
        match entries.get(token) {
            Some((TokenState::Resolved, _)) => false,
            _ => {
                entries.insert(token.to_string(), (TokenState::Resolved, Instant::now()));
                true
            }
        }
    }

    fn sweep(entries: &mut HashMap<String, (TokenState, Instant)>, ttl: Duration) {
        entries.retain(|_, (_, seen)| seen.elapsed() < ttl);
    }
}

/// Outcome of a video transfer initiation
pub enum VideoTransfer {
    /// A job was published; carries the payload for the response echo
    Dispatched(TransferJob),
    /// The referenced media is not a video; nothing was published
    NotVideo,
}

/// Coordinates transfer initiation and completion
#[derive(Clone)]
pub struct TransferCoordinator {
    media_repository: MediaRepository,
    style_repository: StyleRepository,
    notification_repository: NotificationRepository,
    storage: ObjectStorage,
    producer: JobProducer,
    sockets: SocketRegistry,
    tokens: Arc<TokenRegistry>,
}

impl TransferCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        media_repository: MediaRepository,
        style_repository: StyleRepository,
        notification_repository: NotificationRepository,
        storage: ObjectStorage,
        producer: JobProducer,
        sockets: SocketRegistry,
        tokens: Arc<TokenRegistry>,
    ) -> Self {
        Self {
            media_repository,
            style_repository,
            notification_repository,
            storage,
            producer,
            sockets,
            tokens,
        }
    }

    /// Publish a photo transfer job on the caller-supplied routing key
    ///
    /// The asset location is forwarded verbatim and no media lookup is
    /// performed; the photo flow operates on temporary uploads that have
    /// no media row yet.
    pub async fn initiate_photo(&self, request: &TransferPhotoRequest) -> ApiResult<TransferJob> {
        let job = TransferJob {
            asset_url: request.asset_location.clone(),
            style_id: request.style.id,
            correlation_token: Some(request.correlation_token.clone()),
            user_id: None,
            target_album_id: None,
        };

        // The token must be outstanding before the job leaves the process;
        // a completion can race the publish but never the begin.
        self.tokens.begin(&request.correlation_token);

        self.producer
            .publish(&request.style.routing_key, &job)
            .await
            .map_err(|e| {
                error!("Failed to publish photo transfer job: {}", e);
                ApiError::Upstream(e.to_string())
            })?;

        Ok(job)
    }

    /// Resolve a stored video and publish its transfer job
    pub async fn initiate_video(
        &self,
        user_id: Uuid,
        request: &TransferVideoRequest,
    ) -> ApiResult<VideoTransfer> {
        let media = self
            .media_repository
            .find_by_id(request.media_id)
            .await
            .map_err(|e| {
                error!("Failed to load media {}: {}", request.media_id, e);
                ApiError::InternalServerError
            })?
            .ok_or_else(|| ApiError::NotFound("Media not found".to_string()))?;

        if media.media_type != MediaType::Video {
            return Ok(VideoTransfer::NotVideo);
        }

        let style = self
            .style_repository
            .find_style(request.style_id)
            .await
            .map_err(|e| {
                error!("Failed to load style {}: {}", request.style_id, e);
                ApiError::InternalServerError
            })?
            .ok_or_else(|| ApiError::NotFound("Style not found".to_string()))?;

        // Video locations are directory-like; workers read the canonical
        // source file inside them.
        let source = format!("{}/original.mp4", media.storage_location);
        let job = TransferJob {
            asset_url: self.storage.cdn_url(&source),
            style_id: style.id,
            correlation_token: None,
            user_id: Some(user_id),
            target_album_id: request.save_album_id,
        };

        self.producer
            .publish(&style.routing_key, &job)
            .await
            .map_err(|e| {
                error!("Failed to publish video transfer job: {}", e);
                ApiError::Upstream(e.to_string())
            })?;

        Ok(VideoTransfer::Dispatched(job))
    }

    /// Persist a finished transfer and notify the originating client
    ///
    /// Returns None when the completion carried an already-resolved
    /// token; nothing is persisted or emitted in that case. A token with
    /// no live socket connection is not an error and the media row is
    /// still created.
    pub async fn complete(
        &self,
        completion: &TransferCompletion,
        media_type: MediaType,
    ) -> ApiResult<Option<MediaWithAccess>> {
        if let Some(token) = &completion.correlation_token {
            if !self.tokens.resolve(token) {
                info!("Ignoring repeated completion for token {}", token);
                return Ok(None);
            }
        }

        let new_media = NewMedia {
            user_id: completion.user_id,
            album_id: completion.target_album_id,
            media_type,
            storage_location: completion.result_location.clone(),
            name: Utc::now().timestamp_millis().to_string(),
        };

        let media = self.media_repository.create(&new_media).await.map_err(|e| {
            error!("Failed to persist completed transfer: {}", e);
            ApiError::InternalServerError
        })?;

        let access_url = self.storage.cdn_url(&media.storage_location);

        if let Some(user_id) = completion.user_id {
            self.notification_repository
                .create(Some(user_id), "Your request is completed!")
                .await
                .map_err(|e| {
                    error!("Failed to persist notification: {}", e);
                    ApiError::InternalServerError
                })?;
        }

        let media = MediaWithAccess { media, access_url };

        if let Some(token) = &completion.correlation_token {
            let mut data = serde_json::to_value(completion).map_err(|e| {
                error!("Failed to serialize completion payload: {}", e);
                ApiError::InternalServerError
            })?;
            if let Value::Object(map) = &mut data {
                map.insert("status".to_string(), Value::String("COMPLETED".to_string()));
                map.insert(
                    "accessURL".to_string(),
                    Value::String(media.access_url.clone()),
                );
            }
            self.sockets.emit(token, TRANSFER_COMPLETED, data).await;
        }

        Ok(Some(media))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_unknown_token_is_trusted() {
        let registry = TokenRegistry::new(Duration::from_secs(60));
        assert!(registry.resolve("never-begun"));
    }

    #[test]
    fn test_repeated_resolve_is_rejected() {
        let registry = TokenRegistry::new(Duration::from_secs(60));
        registry.begin("tok");
        assert!(registry.resolve("tok"));
        assert!(!registry.resolve("tok"));
    }

    #[test]
    fn test_begin_reopens_a_resolved_token() {
        let registry = TokenRegistry::new(Duration::from_secs(60));
        registry.begin("tok");
        assert!(registry.resolve("tok"));

        // The client reuses its socket token for a second transfer.
        registry.begin("tok");
        assert!(registry.resolve("tok"));
    }

    #[test]
    fn test_resolved_entry_expires() {
        let registry = TokenRegistry::new(Duration::from_millis(10));
        registry.begin("tok");
        assert!(registry.resolve("tok"));

        std::thread::sleep(Duration::from_millis(20));
        assert!(registry.resolve("tok"));
    }

    // Ignored by default; run with `cargo test -- --ignored` against a
    // reachable database.
    #[tokio::test]
    #[ignore]
    async fn test_duplicate_completion_creates_one_media_row()
    -> Result<(), Box<dyn std::error::Error>> {
        let state = crate::state::testing::state().await?;
        let location = format!("results/{}", Uuid::new_v4());
        let completion = TransferCompletion {
            correlation_token: Some(format!("tok-{}", Uuid::new_v4())),
            user_id: None,
            result_location: location.clone(),
            target_album_id: None,
            media_type: None,
        };

        let first = state
            .coordinator
            .complete(&completion, MediaType::Photo)
            .await?;
        assert!(first.is_some());

        let second = state
            .coordinator
            .complete(&completion, MediaType::Photo)
            .await?;
        assert!(second.is_none(), "second delivery should be a no-op");

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM medias WHERE storage_location = $1")
                .bind(&location)
                .fetch_one(&state.db_pool)
                .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[test]
    #[serial]
    fn test_transfer_config_defaults() {
        unsafe {
            std::env::remove_var("TRANSFER_TOKEN_TTL");
        }

        let config = TransferConfig::from_env();
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
    }

    #[test]
    #[serial]
    fn test_transfer_config_reads_env() {
        unsafe {
            std::env::set_var("TRANSFER_TOKEN_TTL", "60");
        }

        let config = TransferConfig::from_env();
        assert_eq!(config.token_ttl, Duration::from_secs(60));

        unsafe {
            std::env::remove_var("TRANSFER_TOKEN_TTL");
        }
    }
}
