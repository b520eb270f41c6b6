//! API service routes

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod medias;
pub mod notifications;
pub mod socket;
pub mod styles;
pub mod transfers;

const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/transfer-video", post(transfers::transfer_video))
        .route("/upload", post(medias::upload))
        .route("/upload-temporary", post(medias::upload_temporary))
        .route("/save-to-album", post(medias::save_to_album))
        .route(
            "/medias/:id",
            delete(medias::delete_media).put(medias::update_media),
        )
        .route("/models/:id/snapshots", post(styles::upload_snapshot))
        .route("/notifications", get(notifications::get_notifications))
        .route(
            "/notifications/:id/read",
            put(notifications::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/transfer-photo", post(transfers::transfer_photo))
        .route(
            "/transfer-photo/completed",
            post(transfers::transfer_photo_completed),
        )
        .route(
            "/transfer-video/completed",
            post(transfers::transfer_video_completed),
        )
        .route("/medias", get(medias::get_medias))
        .route("/medias/:id", get(medias::get_media))
        .route("/styles", post(styles::create_style).get(styles::get_styles))
        .route("/styles/:id", get(styles::get_style))
        .route("/models", post(styles::create_model).get(styles::get_models))
        .route("/models/:id", get(styles::get_model))
        .route(
            "/models/:id/active-snapshot",
            put(styles::update_active_snapshot),
        )
        .route("/socket", get(socket::socket_handler))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_up { "ok" } else { "degraded" },
            "service": "artisan-api"
        })),
    )
}
