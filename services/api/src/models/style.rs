//! Style and model catalog types
//!
//! A style is the client-facing effect; each style owns a routing key
//! selecting the worker pool that applies it. A model is the trained
//! network behind a style, and snapshots are its stored weight files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transfer style offered to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub id: Uuid,
    pub name: String,
    pub routing_key: String,
    pub created_at: DateTime<Utc>,
}

/// Request to register a style
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStyleRequest {
    pub name: String,
    pub routing_key: String,
}

/// A trained model belonging to a style
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelItem {
    pub id: Uuid,
    pub name: String,
    pub style_id: Uuid,
    pub active_snapshot_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to register a model
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelRequest {
    pub name: String,
    pub style_id: Uuid,
}

/// Stored weight file for a model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: Uuid,
    pub model_id: Uuid,
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Request to activate a snapshot
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActiveSnapshotRequest {
    pub snapshot_id: Uuid,
}

/// Response for snapshot activation
#[derive(Debug, Serialize)]
pub struct ActiveSnapshotResponse {
    pub model: ModelItem,
    pub snapshot: Snapshot,
    pub style: Style,
}

/// Payload published to a worker pool when its model weights change
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUpdateJob {
    pub snapshot_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_update_wire_shape() {
        let job = ModelUpdateJob {
            snapshot_location: "snapshots/2023-04-18/1681810200000".to_string(),
        };

        let wire = serde_json::to_value(&job).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"snapshotLocation": "snapshots/2023-04-18/1681810200000"})
        );
    }
}
