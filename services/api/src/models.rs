//! API models for request and response payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod media;
pub mod notification;
pub mod style;
pub mod transfer;

/// Request for user registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of a user, never carries the password digest
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub default_album_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(rename = "iconURL")]
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response for login and registration
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_response_wire_shape() {
        let at = Utc.with_ymd_and_hms(2023, 4, 18, 9, 30, 0).unwrap();
        let user = UserResponse {
            id: Uuid::nil(),
            username: "phuong".to_string(),
            default_album_id: None,
            first_name: "Phuong".to_string(),
            last_name: String::new(),
            email: String::new(),
            date_of_birth: None,
            icon_url: Some("https://cdn.example.com/avatar.jpg".to_string()),
            created_at: at,
            updated_at: at,
        };

        let wire = serde_json::to_value(&user).unwrap();
        assert_eq!(wire["username"], "phuong");
        assert_eq!(wire["firstName"], "Phuong");
        assert_eq!(wire["iconURL"], "https://cdn.example.com/avatar.jpg");
        assert!(wire.get("password").is_none());
    }
}
