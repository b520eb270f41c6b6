//! Style catalog and model management handlers

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use storage::{KeyScope, object_key};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::style::{
        ActiveSnapshotResponse, CreateModelRequest, CreateStyleRequest, ModelUpdateJob,
        UpdateActiveSnapshotRequest,
    },
    state::AppState,
    validation,
};

use super::medias::read_upload;

/// Register a style
pub async fn create_style(
    State(state): State<AppState>,
    Json(payload): Json<CreateStyleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let style = state
        .style_repository
        .create_style(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create style: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(style)))
}

/// Get all styles
pub async fn get_styles(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let styles = state.style_repository.list_styles().await.map_err(|e| {
        tracing::error!("Failed to get styles: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(styles))
}

/// Get a style by ID
pub async fn get_style(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let style = state
        .style_repository
        .find_style(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get style: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Style not found".to_string()))?;

    Ok(Json(style))
}

/// Register a model under a style
pub async fn create_model(
    State(state): State<AppState>,
    Json(payload): Json<CreateModelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let style = state
        .style_repository
        .find_style(payload.style_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get style: {}", e);
            ApiError::InternalServerError
        })?;
    if style.is_none() {
        return Err(ApiError::NotFound("Style not found".to_string()));
    }

    let model = state
        .style_repository
        .create_model(&payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create model: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(model)))
}

/// Get all models
pub async fn get_models(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let models = state.style_repository.list_models().await.map_err(|e| {
        tracing::error!("Failed to get models: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(models))
}

/// Get a model by ID
pub async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let model = state
        .style_repository
        .find_model(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get model: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Model not found".to_string()))?;

    Ok(Json(model))
}

/// Store an uploaded weights file and record it as a snapshot
pub async fn upload_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let model = state
        .style_repository
        .find_model(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get model: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Model not found".to_string()))?;

    let (file, _) = read_upload(&mut multipart, "snapshot").await?;
    let file = file.ok_or_else(|| ApiError::BadRequest("Missing snapshot file".to_string()))?;

    validation::validate_snapshot_upload(&file.file_name).map_err(ApiError::BadRequest)?;

    let key = object_key(KeyScope::Snapshots, Utc::now());
    state
        .storage
        .upload(&key, &file.content_type, file.bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store snapshot: {}", e);
            ApiError::Upstream(e.to_string())
        })?;

    let snapshot = state
        .style_repository
        .create_snapshot(model.id, &key)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create snapshot: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Activate a snapshot and tell the worker pool to swap its weights
pub async fn update_active_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActiveSnapshotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let model = state
        .style_repository
        .find_model(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get model: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Model not found".to_string()))?;

    let snapshot = state
        .style_repository
        .find_snapshot(payload.snapshot_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get snapshot: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Snapshot not found".to_string()))?;

    if snapshot.model_id != model.id {
        return Err(ApiError::BadRequest(
            "Snapshot does not belong to model".to_string(),
        ));
    }

    let style = state
        .style_repository
        .find_style(model.style_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get style: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Style not found".to_string()))?;

    let model = state
        .style_repository
        .set_active_snapshot(model.id, snapshot.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to activate snapshot: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Model not found".to_string()))?;

    state
        .producer
        .publish(
            &style.routing_key,
            &ModelUpdateJob {
                snapshot_location: snapshot.location.clone(),
            },
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to publish model update: {}", e);
            ApiError::Upstream(e.to_string())
        })?;

    Ok(Json(ActiveSnapshotResponse {
        model,
        snapshot,
        style,
    }))
}
