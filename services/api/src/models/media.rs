//! Media models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "PHOTO")]
    Photo,
    #[serde(rename = "VIDEO")]
    Video,
}

impl MediaType {
    /// Classify an upload from its declared content type
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.contains("image") {
            MediaType::Photo
        } else {
            MediaType::Video
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "PHOTO",
            MediaType::Video => "VIDEO",
        }
    }

    /// Parse a stored discriminator; unknown values fall back to PHOTO
    pub fn from_db(value: &str) -> Self {
        match value {
            "VIDEO" => MediaType::Video,
            _ => MediaType::Photo,
        }
    }
}

/// Media item model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub storage_location: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a media row
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub user_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    pub media_type: MediaType,
    pub storage_location: String,
    pub name: String,
}

/// A media item joined with its computed access URL
#[derive(Debug, Clone, Serialize)]
pub struct MediaWithAccess {
    #[serde(flatten)]
    pub media: MediaItem,
    #[serde(rename = "accessURL")]
    pub access_url: String,
}

/// Query parameters for media listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQuery {
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
    /// Filter by album
    pub album_id: Option<Uuid>,
    /// Filter by owner
    pub user_id: Option<Uuid>,
    /// Filter by media type
    #[serde(rename = "type")]
    pub media_type: Option<MediaType>,
}

/// Response for media listing with pagination
#[derive(Debug, Clone, Serialize)]
pub struct MediaListResponse {
    pub items: Vec<MediaWithAccess>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

/// Request for moving a media item between albums
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMediaRequest {
    pub album_id: Uuid,
}

/// Request for persisting a temporary photo into an album
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveToAlbumRequest {
    pub photo_location: String,
    pub album_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_classification_from_content_type() {
        assert_eq!(MediaType::from_content_type("image/png"), MediaType::Photo);
        assert_eq!(MediaType::from_content_type("image/jpeg"), MediaType::Photo);
        assert_eq!(MediaType::from_content_type("video/mp4"), MediaType::Video);
        assert_eq!(
            MediaType::from_content_type("application/octet-stream"),
            MediaType::Video
        );
    }

    #[test]
    fn test_media_type_db_round_trip() {
        assert_eq!(MediaType::from_db(MediaType::Photo.as_str()), MediaType::Photo);
        assert_eq!(MediaType::from_db(MediaType::Video.as_str()), MediaType::Video);
    }

    #[test]
    fn test_media_with_access_wire_shape() {
        let at = Utc.with_ymd_and_hms(2023, 4, 18, 9, 30, 0).unwrap();
        let user_id = Uuid::new_v4();
        let item = MediaWithAccess {
            media: MediaItem {
                id: Uuid::nil(),
                user_id: Some(user_id),
                album_id: None,
                media_type: MediaType::Photo,
                storage_location: "users/u/2023-04-18/1".to_string(),
                name: "sunset.png".to_string(),
                created_at: at,
                updated_at: at,
            },
            access_url: "https://cdn.example.com/users/u/2023-04-18/1".to_string(),
        };

        let wire = serde_json::to_value(&item).unwrap();
        assert_eq!(wire["type"], "PHOTO");
        assert_eq!(wire["storageLocation"], "users/u/2023-04-18/1");
        assert_eq!(wire["accessURL"], "https://cdn.example.com/users/u/2023-04-18/1");
        assert_eq!(wire["userId"], user_id.to_string());
    }
}
