//! Registration and login handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
    state::AppState,
    validation,
};

/// Register a new user and issue their first token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let existing = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check username: {}", e);
            ApiError::InternalServerError
        })?;
    if existing.is_some() {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }

    let user = state.user_repository.create(&payload).await.map_err(|e| {
        tracing::error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    let access_token = state.jwt_service.generate_token(user.id).map_err(|e| {
        tracing::error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.token_expiry(),
        user: user.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log a user in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    if !state.user_repository.verify_password(&user, &payload.password) {
        return Err(ApiError::Unauthorized);
    }

    let access_token = state.jwt_service.generate_token(user.id).map_err(|e| {
        tracing::error!("Failed to generate token: {}", e);
        ApiError::InternalServerError
    })?;

    let response = AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_service.token_expiry(),
        user: user.into(),
    };

    Ok(Json(response))
}
