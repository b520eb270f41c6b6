//! Style transfer initiation and completion handlers

use axum::{
    Extension, Json, extract::State, http::StatusCode, response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::ApiError,
    middleware::AuthUser,
    models::media::MediaType,
    models::transfer::{TransferCompletion, TransferPhotoRequest, TransferVideoRequest},
    state::AppState,
    transfer::VideoTransfer,
};

/// Dispatch a photo transfer job on the caller-supplied routing key
pub async fn transfer_photo(
    State(state): State<AppState>,
    Json(payload): Json<TransferPhotoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.coordinator.initiate_photo(&payload).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": 202,
            "message": "Your request is executing."
        })),
    ))
}

/// Dispatch a video transfer job for a stored media item
pub async fn transfer_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<TransferVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match state.coordinator.initiate_video(user.id, &payload).await? {
        VideoTransfer::Dispatched(job) => Ok((
            StatusCode::ACCEPTED,
            Json(json!({
                "payload": job,
                "status": 202,
                "message": "Your request is executing."
            })),
        )),
        VideoTransfer::NotVideo => Ok((
            StatusCode::OK,
            Json(json!({
                "message": "Media is not type video"
            })),
        )),
    }
}

/// Worker callback for a finished photo transfer
pub async fn transfer_photo_completed(
    State(state): State<AppState>,
    Json(payload): Json<TransferCompletion>,
) -> Result<impl IntoResponse, ApiError> {
    match state
        .coordinator
        .complete(&payload, MediaType::Photo)
        .await?
    {
        Some(_) => Ok(Json(json!({
            "status": 200,
            "message": "Your request is completed!"
        }))),
        None => Ok(Json(json!({
            "status": 200,
            "message": "Already completed."
        }))),
    }
}

/// Worker callback for a finished video transfer
pub async fn transfer_video_completed(
    State(state): State<AppState>,
    Json(payload): Json<TransferCompletion>,
) -> Result<impl IntoResponse, ApiError> {
    match state
        .coordinator
        .complete(&payload, MediaType::Video)
        .await?
    {
        Some(media) => Ok(Json(media).into_response()),
        None => Ok(Json(json!({
            "status": 200,
            "message": "Already completed."
        }))
        .into_response()),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::media::NewMedia;

    // Ignored by default; run with `cargo test -- --ignored` against a
    // reachable database.
    #[tokio::test]
    #[ignore]
    async fn test_transfer_video_tolerates_non_video_media()
    -> Result<(), Box<dyn std::error::Error>> {
        let state = crate::state::testing::state().await?;

        let owner = Uuid::new_v4();
        let media = state
            .media_repository
            .create(&NewMedia {
                user_id: Some(owner),
                album_id: None,
                media_type: MediaType::Photo,
                storage_location: format!("users/{owner}/2023-04-18/1681810200000"),
                name: "sunset.png".to_string(),
            })
            .await?;

        let response = transfer_video(
            State(state.clone()),
            Extension(AuthUser { id: owner }),
            Json(TransferVideoRequest {
                media_id: media.id,
                style_id: Uuid::new_v4(),
                save_album_id: None,
            }),
        )
        .await
        .map_err(|e| format!("handler rejected the request: {e}"))?
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(body["message"], "Media is not type video");

        Ok(())
    }
}
