//! Style, model and snapshot repository

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::style::{CreateModelRequest, CreateStyleRequest, ModelItem, Snapshot, Style};

fn style_from_row(row: &PgRow) -> Style {
    Style {
        id: row.get("id"),
        name: row.get("name"),
        routing_key: row.get("routing_key"),
        created_at: row.get("created_at"),
    }
}

fn model_from_row(row: &PgRow) -> ModelItem {
    ModelItem {
        id: row.get("id"),
        name: row.get("name"),
        style_id: row.get("style_id"),
        active_snapshot_id: row.get("active_snapshot_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn snapshot_from_row(row: &PgRow) -> Snapshot {
    Snapshot {
        id: row.get("id"),
        model_id: row.get("model_id"),
        location: row.get("location"),
        created_at: row.get("created_at"),
    }
}

/// Repository for the style catalog and its models
#[derive(Clone)]
pub struct StyleRepository {
    pool: PgPool,
}

impl StyleRepository {
    /// Create a new style repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a style
    pub async fn create_style(&self, new_style: &CreateStyleRequest) -> Result<Style> {
        let row = sqlx::query(
            r#"
            INSERT INTO styles (name, routing_key)
            VALUES ($1, $2)
            RETURNING id, name, routing_key, created_at
            "#,
        )
        .bind(&new_style.name)
        .bind(&new_style.routing_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(style_from_row(&row))
    }

    /// List all styles
    pub async fn list_styles(&self) -> Result<Vec<Style>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, routing_key, created_at
            FROM styles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(style_from_row).collect())
    }

    /// Get a style by ID
    pub async fn find_style(&self, id: Uuid) -> Result<Option<Style>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, routing_key, created_at
            FROM styles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(style_from_row))
    }

    /// Register a model under a style
    pub async fn create_model(&self, new_model: &CreateModelRequest) -> Result<ModelItem> {
        let row = sqlx::query(
            r#"
            INSERT INTO models (name, style_id)
            VALUES ($1, $2)
            RETURNING id, name, style_id, active_snapshot_id, created_at, updated_at
            "#,
        )
        .bind(&new_model.name)
        .bind(new_model.style_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(model_from_row(&row))
    }

    /// List all models
    pub async fn list_models(&self) -> Result<Vec<ModelItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, style_id, active_snapshot_id, created_at, updated_at
            FROM models
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(model_from_row).collect())
    }

    /// Get a model by ID
    pub async fn find_model(&self, id: Uuid) -> Result<Option<ModelItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, style_id, active_snapshot_id, created_at, updated_at
            FROM models
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(model_from_row))
    }

    /// Record an uploaded weights file for a model
    pub async fn create_snapshot(&self, model_id: Uuid, location: &str) -> Result<Snapshot> {
        let row = sqlx::query(
            r#"
            INSERT INTO snapshots (model_id, location)
            VALUES ($1, $2)
            RETURNING id, model_id, location, created_at
            "#,
        )
        .bind(model_id)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(snapshot_from_row(&row))
    }

    /// Get a snapshot by ID
    pub async fn find_snapshot(&self, id: Uuid) -> Result<Option<Snapshot>> {
        let row = sqlx::query(
            r#"
            SELECT id, model_id, location, created_at
            FROM snapshots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(snapshot_from_row))
    }

    /// Mark a snapshot as the one the worker pool should serve
    pub async fn set_active_snapshot(
        &self,
        model_id: Uuid,
        snapshot_id: Uuid,
    ) -> Result<Option<ModelItem>> {
        let row = sqlx::query(
            r#"
            UPDATE models
            SET active_snapshot_id = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, name, style_id, active_snapshot_id, created_at, updated_at
            "#,
        )
        .bind(model_id)
        .bind(snapshot_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(model_from_row))
    }
}
