//! Notification handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{error::ApiError, middleware::AuthUser, state::AppState};

/// Get the caller's notifications, newest first
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let notifications = state
        .notification_repository
        .list_for_user(user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get notifications: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(notifications))
}

/// Mark one notification as read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = state
        .notification_repository
        .find_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get notification: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Notification not found".to_string()))?;

    // Announcements have no owner and anyone may read them.
    if notification.user_id.is_some() && notification.user_id != Some(user.id) {
        return Err(ApiError::Unauthorized);
    }

    let notification = state
        .notification_repository
        .mark_read(id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to mark notification read: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Notification not found".to_string()))?;

    Ok(Json(notification))
}
