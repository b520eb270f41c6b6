//! Media library and upload handlers

use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use gateway::UPLOAD_IMAGE_SUCCESS;
use serde_json::json;
use storage::{KeyScope, object_key};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::media::{
        MediaListResponse, MediaQuery, MediaType, MediaWithAccess, NewMedia, SaveToAlbumRequest,
        UpdateMediaRequest,
    },
    state::AppState,
    validation,
};

/// One file part pulled out of a multipart body
pub(super) struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Location persisted for an object stored under `key`.
///
/// Workers treat a video location as a directory holding the source and
/// its derivatives, so only the key's parent path is stored for videos.
fn stored_location(media_type: MediaType, key: String) -> String {
    match media_type {
        MediaType::Video => key[..key.rfind('/').unwrap_or(key.len())].to_string(),
        MediaType::Photo => key,
    }
}

/// Read a multipart body, returning the named file part and the
/// optional `socketId` text part
pub(super) async fn read_upload(
    multipart: &mut Multipart,
    file_field: &str,
) -> Result<(Option<UploadedFile>, Option<String>), ApiError> {
    let mut file = None;
    let mut socket_token = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::BadRequest("Malformed multipart body".to_string())
    })? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some(n) if n == file_field => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read upload body: {}", e);
                    ApiError::BadRequest("Malformed multipart body".to_string())
                })?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("socketId") => {
                socket_token = Some(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read socketId field: {}", e);
                    ApiError::BadRequest("Malformed multipart body".to_string())
                })?);
            }
            _ => {}
        }
    }

    Ok((file, socket_token))
}

/// Get media items with pagination and filtering
pub async fn get_medias(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state.media_repository.list(&query).await.map_err(|e| {
        tracing::error!("Failed to get media items: {}", e);
        ApiError::InternalServerError
    })?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let items = items
        .into_iter()
        .map(|media| {
            let access_url = state.storage.cdn_url(&media.storage_location);
            MediaWithAccess { media, access_url }
        })
        .collect();

    Ok(Json(MediaListResponse {
        items,
        page,
        limit,
        total,
    }))
}

/// Get a media item by ID
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let media = state
        .media_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get media item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media not found".to_string()))?;

    let access_url = state.storage.cdn_url(&media.storage_location);

    Ok(Json(MediaWithAccess { media, access_url }))
}

/// Soft-delete a media item owned by the caller
pub async fn delete_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let media = state
        .media_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get media item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media not found".to_string()))?;

    if media.user_id != Some(user.id) {
        return Err(ApiError::Unauthorized);
    }

    let deleted = state.media_repository.soft_delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete media item: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(Json(json!({ "id": id })))
    } else {
        Err(ApiError::NotFound("Media not found".to_string()))
    }
}

/// Move a media item owned by the caller to another album
pub async fn update_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMediaRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let media = state
        .media_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get media item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media not found".to_string()))?;

    if media.user_id != Some(user.id) {
        return Err(ApiError::Unauthorized);
    }

    let media = state
        .media_repository
        .update_album(id, payload.album_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to move media item: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Media not found".to_string()))?;

    let access_url = state.storage.cdn_url(&media.storage_location);

    Ok(Json(MediaWithAccess { media, access_url }))
}

/// Store an uploaded file and create its media row
pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (file, socket_token) = read_upload(&mut multipart, "media").await?;
    let file = file.ok_or_else(|| ApiError::BadRequest("Missing media file".to_string()))?;

    let media_type = MediaType::from_content_type(&file.content_type);
    if media_type == MediaType::Photo {
        validation::validate_image_upload(&file.content_type, &file.file_name)
            .map_err(ApiError::BadRequest)?;
    }

    let owner = state
        .user_repository
        .find_by_id(user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load uploading user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let key = object_key(KeyScope::User(user.id), Utc::now());
    state
        .storage
        .upload(&key, &file.content_type, file.bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store uploaded media: {}", e);
            ApiError::Upstream(e.to_string())
        })?;

    let storage_location = stored_location(media_type, key);

    let media = state
        .media_repository
        .create(&NewMedia {
            user_id: Some(user.id),
            album_id: owner.default_album_id,
            media_type,
            storage_location,
            name: file.file_name,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create media row: {}", e);
            ApiError::InternalServerError
        })?;

    let access_url = state.storage.cdn_url(&media.storage_location);
    let payload = MediaWithAccess { media, access_url };

    if let Some(token) = socket_token {
        let data = serde_json::to_value(&payload).map_err(|e| {
            tracing::error!("Failed to serialize upload payload: {}", e);
            ApiError::InternalServerError
        })?;
        state
            .socket_registry
            .emit(&token, UPLOAD_IMAGE_SUCCESS, data)
            .await;
    }

    Ok(Json(json!({
        "status": 200,
        "data": payload
    })))
}

/// Store a photo without creating a media row
///
/// Temporary uploads feed the photo transfer flow; the access URL is
/// the only thing the client needs back.
pub async fn upload_temporary(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (file, socket_token) = read_upload(&mut multipart, "photo").await?;
    let file = file.ok_or_else(|| ApiError::BadRequest("Missing photo file".to_string()))?;

    validation::validate_image_upload(&file.content_type, &file.file_name)
        .map_err(ApiError::BadRequest)?;

    let key = object_key(KeyScope::Assets, Utc::now());
    state
        .storage
        .upload(&key, &file.content_type, file.bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store temporary photo: {}", e);
            ApiError::Upstream(e.to_string())
        })?;

    let payload = json!({ "accessURL": state.storage.cdn_url(&key) });

    if let Some(token) = socket_token {
        state
            .socket_registry
            .emit(&token, UPLOAD_IMAGE_SUCCESS, payload.clone())
            .await;
    }

    Ok(Json(json!({
        "status": 200,
        "data": payload
    })))
}

/// Copy a temporary photo into the caller's album
pub async fn save_to_album(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SaveToAlbumRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let photo_name = Utc::now().to_rfc2822();
    let key = format!("{}/{}", user.id, photo_name);

    state
        .storage
        .copy(&payload.photo_location, &key)
        .await
        .map_err(|e| {
            tracing::error!("Failed to copy photo into album: {}", e);
            ApiError::Upstream(e.to_string())
        })?;

    // The row keeps the original location; the album copy exists only
    // as a backup object.
    let media = state
        .media_repository
        .create(&NewMedia {
            user_id: Some(user.id),
            album_id: payload.album_id,
            media_type: MediaType::Photo,
            storage_location: payload.photo_location,
            name: photo_name,
        })
        .await
        .map_err(|e| {
            tracing::error!("Failed to create media row: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(media))
}
