//! Repositories for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{RegisterRequest, UserResponse};
use crate::password;

pub mod media;
pub mod notification;
pub mod style;

/// Full user row, including the password digest
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub default_album_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        UserResponse {
            id: record.id,
            username: record.username,
            default_album_id: record.default_album_id,
            first_name: record.first_name,
            last_name: record.last_name,
            email: record.email,
            date_of_birth: record.date_of_birth,
            icon_url: record.icon_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    hash_secret: String,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool, hash_secret: String) -> Self {
        Self { pool, hash_secret }
    }

    /// Create a new user with a freshly minted default album id
    pub async fn create(&self, new_user: &RegisterRequest) -> Result<UserRecord> {
        info!("Creating new user: {}", new_user.username);

        let password_digest = password::hash_password(&new_user.password, &self.hash_secret);

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password, default_album_id, first_name, last_name, email, date_of_birth)
            VALUES ($1, $2, gen_random_uuid(), $3, $4, $5, $6)
            RETURNING id, username, password, default_album_id, first_name, last_name, email,
                      date_of_birth, icon_url, created_at, updated_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&password_digest)
        .bind(new_user.first_name.as_deref().unwrap_or(""))
        .bind(new_user.last_name.as_deref().unwrap_or(""))
        .bind(new_user.email.as_deref().unwrap_or(""))
        .bind(new_user.date_of_birth)
        .fetch_one(&self.pool)
        .await?;

        let user = UserRecord {
            id: row.get("id"),
            username: row.get("username"),
            password: row.get("password"),
            default_album_id: row.get("default_album_id"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            email: row.get("email"),
            date_of_birth: row.get("date_of_birth"),
            icon_url: row.get("icon_url"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        info!("Finding user by username: {}", username);

        let row = sqlx::query(
            r#"
            SELECT id, username, password, default_album_id, first_name, last_name, email,
                   date_of_birth, icon_url, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let user = UserRecord {
                    id: row.get("id"),
                    username: row.get("username"),
                    password: row.get("password"),
                    default_album_id: row.get("default_album_id"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                    email: row.get("email"),
                    date_of_birth: row.get("date_of_birth"),
                    icon_url: row.get("icon_url"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                };
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password, default_album_id, first_name, last_name, email,
                   date_of_birth, icon_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let user = UserRecord {
                    id: row.get("id"),
                    username: row.get("username"),
                    password: row.get("password"),
                    default_album_id: row.get("default_album_id"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                    email: row.get("email"),
                    date_of_birth: row.get("date_of_birth"),
                    icon_url: row.get("icon_url"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                };
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Check a candidate password against the stored digest
    pub fn verify_password(&self, user: &UserRecord, candidate: &str) -> bool {
        password::verify_password(candidate, &self.hash_secret, &user.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_record_to_response_drops_digest() {
        let at = Utc.with_ymd_and_hms(2023, 4, 18, 9, 30, 0).unwrap();
        let record = UserRecord {
            id: Uuid::new_v4(),
            username: "phuong".to_string(),
            password: "digest".to_string(),
            default_album_id: Some(Uuid::new_v4()),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            date_of_birth: None,
            icon_url: None,
            created_at: at,
            updated_at: at,
        };

        let response = UserResponse::from(record.clone());
        assert_eq!(response.id, record.id);
        assert_eq!(response.username, "phuong");

        let wire = serde_json::to_value(&response).unwrap();
        assert!(wire.get("password").is_none());
    }
}
