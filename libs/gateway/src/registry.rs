//! Connection registry keyed by correlation token

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Event pushed when a style transfer finishes
pub const TRANSFER_COMPLETED: &str = "TRANSFER_COMPLETED";

/// Event pushed when an upload finishes
pub const UPLOAD_IMAGE_SUCCESS: &str = "UPLOAD_IMAGE_SUCCESS";

/// A named event pushed to a single client
#[derive(Debug, Clone, Serialize)]
pub struct ClientEvent {
    pub event: String,
    pub data: Value,
}

/// Manages the live connections and routes events to them by token.
#[derive(Clone)]
pub struct SocketRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    /// token -> (conn_id, sender)
    clients: RwLock<HashMap<String, (Uuid, mpsc::UnboundedSender<ClientEvent>)>>,
}

impl SocketRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                clients: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Register a connection under `token`. Returns (conn_id, receiver).
    ///
    /// A previous connection holding the same token is replaced; its receiver
    /// closes and its loop winds down on its own.
    pub async fn register(&self, token: &str) -> (Uuid, mpsc::UnboundedReceiver<ClientEvent>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .clients
            .write()
            .await
            .insert(token.to_string(), (conn_id, tx));
        (conn_id, rx)
    }

    /// Unregister a token's connection, but only if conn_id matches.
    pub async fn unregister(&self, token: &str, conn_id: Uuid) {
        let mut clients = self.inner.clients.write().await;
        if let Some((stored_conn_id, _)) = clients.get(token) {
            if *stored_conn_id == conn_id {
                clients.remove(token);
            }
        }
    }

    /// Push a named event to the connection registered under `token`.
    ///
    /// Returns whether a connection was registered. An absent token is not
    /// an error: the client may simply have disconnected.
    pub async fn emit(&self, token: &str, event: &str, data: Value) -> bool {
        let clients = self.inner.clients.read().await;
        match clients.get(token) {
            Some((_, tx)) => tx
                .send(ClientEvent {
                    event: event.to_string(),
                    data,
                })
                .is_ok(),
            None => false,
        }
    }
}

impl Default for SocketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
