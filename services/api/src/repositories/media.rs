//! Media repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::media::{MediaItem, MediaQuery, MediaType, NewMedia};

fn media_from_row(row: &PgRow) -> MediaItem {
    let media_type: String = row.get("type");
    MediaItem {
        id: row.get("id"),
        user_id: row.get("user_id"),
        album_id: row.get("album_id"),
        media_type: MediaType::from_db(&media_type),
        storage_location: row.get("storage_location"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Media repository for database operations
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// Create a new media repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a media row
    pub async fn create(&self, new_media: &NewMedia) -> Result<MediaItem> {
        let row = sqlx::query(
            r#"
            INSERT INTO medias (user_id, album_id, type, storage_location, name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, album_id, type, storage_location, name, created_at, updated_at
            "#,
        )
        .bind(new_media.user_id)
        .bind(new_media.album_id)
        .bind(new_media.media_type.as_str())
        .bind(&new_media.storage_location)
        .bind(&new_media.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(media_from_row(&row))
    }

    /// Get a live media item by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MediaItem>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, album_id, type, storage_location, name, created_at, updated_at
            FROM medias
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(media_from_row))
    }

    /// List live media items with pagination and filtering, newest first
    pub async fn list(&self, query: &MediaQuery) -> Result<(Vec<MediaItem>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);
        let offset = (page - 1) as i64 * limit as i64;
        let media_type = query.media_type.map(|t| t.as_str());

        let rows = sqlx::query(
            r#"
            SELECT id, user_id, album_id, type, storage_location, name, created_at, updated_at
            FROM medias
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR album_id = $2)
              AND ($3::varchar IS NULL OR type = $3)
              AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.user_id)
        .bind(query.album_id)
        .bind(media_type)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM medias
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR album_id = $2)
              AND ($3::varchar IS NULL OR type = $3)
              AND deleted_at IS NULL
            "#,
        )
        .bind(query.user_id)
        .bind(query.album_id)
        .bind(media_type)
        .fetch_one(&self.pool)
        .await?;

        let items = rows.iter().map(media_from_row).collect();

        Ok((items, count))
    }

    /// Soft-delete a media item; returns false when no live row matched
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE medias
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Move a media item to another album
    pub async fn update_album(&self, id: Uuid, album_id: Uuid) -> Result<Option<MediaItem>> {
        let row = sqlx::query(
            r#"
            UPDATE medias
            SET album_id = $2, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, user_id, album_id, type, storage_location, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(album_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(media_from_row))
    }
}
