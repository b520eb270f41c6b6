//! Notification repository

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::notification::Notification;

fn notification_from_row(row: &PgRow) -> Notification {
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        is_readed: row.get("is_readed"),
        created_at: row.get("created_at"),
    }
}

/// Notification repository
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification row; a missing user id marks an announcement
    pub async fn create(&self, user_id: Option<Uuid>, message: &str) -> Result<Notification> {
        let row = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING id, user_id, message, is_readed, created_at
            "#,
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification_from_row(&row))
    }

    /// List a user's notifications plus announcements, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, message, is_readed, created_at
            FROM notifications
            WHERE user_id = $1 OR user_id IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(notification_from_row).collect())
    }

    /// Get a notification by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, message, is_readed, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(notification_from_row))
    }

    /// Flip a notification to read
    pub async fn mark_read(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query(
            r#"
            UPDATE notifications
            SET is_readed = TRUE
            WHERE id = $1
            RETURNING id, user_id, message, is_readed, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(notification_from_row))
    }
}
