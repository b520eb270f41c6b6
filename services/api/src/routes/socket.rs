//! WebSocket upgrade endpoint

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for the socket upgrade
#[derive(Debug, Deserialize)]
pub struct SocketParams {
    /// Correlation token the connection is registered under
    pub token: String,
}

/// Upgrade to a WebSocket registered under the caller's token
pub async fn socket_handler(
    State(state): State<AppState>,
    Query(params): Query<SocketParams>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let registry = state.socket_registry.clone();
    ws.on_upgrade(move |socket| gateway::handle_socket(socket, registry, params.token))
}
