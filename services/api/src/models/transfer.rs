//! Style transfer request, job and completion types
//!
//! Job payloads cross the queue boundary to the worker fleet and keep
//! the workers' field naming. Optional correlation fields are omitted
//! from the serialized payload instead of being sent as null.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::media::MediaType;

/// Style reference embedded in a photo transfer request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRef {
    pub id: Uuid,
    pub routing_key: String,
}

/// Request to stylize a single photo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPhotoRequest {
    pub asset_location: String,
    pub style: StyleRef,
    pub correlation_token: String,
}

/// Request to stylize an uploaded video
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferVideoRequest {
    pub media_id: Uuid,
    pub style_id: Uuid,
    pub save_album_id: Option<Uuid>,
}

/// Payload published to a style worker queue
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferJob {
    #[serde(rename = "assetURL")]
    pub asset_url: String,
    pub style_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_album_id: Option<Uuid>,
}

/// Completion report posted back by a worker
///
/// Arrives over HTTP callback or the completion queue with the same
/// shape either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCompletion {
    #[serde(default)]
    pub correlation_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub result_location: String,
    #[serde(default)]
    pub target_album_id: Option<Uuid>,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_job_wire_shape() {
        let job = TransferJob {
            asset_url: "https://cdn.example.com/users/u/2023-04-18/1681810200000".to_string(),
            style_id: Uuid::new_v4(),
            correlation_token: Some("socket-abc".to_string()),
            user_id: None,
            target_album_id: None,
        };

        let wire = serde_json::to_value(&job).unwrap();
        assert!(wire.get("assetURL").is_some());
        assert!(wire.get("correlationToken").is_some());
        assert!(wire.get("userId").is_none());
        assert!(wire.get("targetAlbumId").is_none());
    }

    #[test]
    fn test_video_job_wire_shape() {
        let user_id = Uuid::new_v4();
        let album_id = Uuid::new_v4();
        let job = TransferJob {
            asset_url: "https://cdn.example.com/videos/abc/original.mp4".to_string(),
            style_id: Uuid::new_v4(),
            correlation_token: None,
            user_id: Some(user_id),
            target_album_id: Some(album_id),
        };

        let wire = serde_json::to_value(&job).unwrap();
        assert!(wire.get("correlationToken").is_none());
        assert_eq!(wire["userId"], serde_json::json!(user_id));
        assert_eq!(wire["targetAlbumId"], serde_json::json!(album_id));
    }

    #[test]
    fn test_completion_accepts_minimal_payload() {
        let completion: TransferCompletion =
            serde_json::from_str(r#"{"resultLocation": "results/2023-04-18/1681810200000"}"#)
                .unwrap();

        assert_eq!(completion.result_location, "results/2023-04-18/1681810200000");
        assert!(completion.correlation_token.is_none());
        assert!(completion.user_id.is_none());
        assert!(completion.target_album_id.is_none());
        assert!(completion.media_type.is_none());
    }

    #[test]
    fn test_completion_media_type_parses() {
        let completion: TransferCompletion = serde_json::from_str(
            r#"{"resultLocation": "r/x", "mediaType": "PHOTO", "correlationToken": "tok"}"#,
        )
        .unwrap();

        assert_eq!(completion.media_type, Some(MediaType::Photo));
        assert_eq!(completion.correlation_token.as_deref(), Some("tok"));
    }
}
