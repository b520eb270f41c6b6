//! Object key naming scheme
//!
//! Uploaded objects are grouped by scope, then by upload date, and named
//! after the upload instant in epoch milliseconds. Keys never contain the
//! original file name.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Top-level prefix an uploaded object is stored under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Personal uploads, prefixed with the owner's id
    User(Uuid),
    /// Style preview assets uploaded by administrators
    Assets,
    /// Trained model snapshot files
    Snapshots,
}

/// Build the object key for an upload happening at `at`.
///
/// The layout is `{scope}/{yyyy-mm-dd}/{epoch-millis}`, with user uploads
/// carrying the owner id between the scope and the date.
pub fn object_key(scope: KeyScope, at: DateTime<Utc>) -> String {
    let date = at.format("%Y-%m-%d");
    let millis = at.timestamp_millis();

    match scope {
        KeyScope::User(user_id) => format!("users/{}/{}/{}", user_id, date, millis),
        KeyScope::Assets => format!("assets/{}/{}", date, millis),
        KeyScope::Snapshots => format!("snapshots/{}/{}", date, millis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_key_layout() {
        let user_id = Uuid::parse_str("a4a21c03-0aa0-46b1-a1d5-4ea73b6382cc").unwrap();
        let at = Utc.with_ymd_and_hms(2023, 4, 18, 9, 30, 0).unwrap();

        let key = object_key(KeyScope::User(user_id), at);
        assert_eq!(
            key,
            "users/a4a21c03-0aa0-46b1-a1d5-4ea73b6382cc/2023-04-18/1681810200000"
        );
    }

    #[test]
    fn test_assets_key_layout() {
        let at = Utc.with_ymd_and_hms(2023, 4, 18, 9, 30, 0).unwrap();
        assert_eq!(object_key(KeyScope::Assets, at), "assets/2023-04-18/1681810200000");
    }

    #[test]
    fn test_snapshots_key_layout() {
        let at = Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 1).unwrap();
        let key = object_key(KeyScope::Snapshots, at);
        assert!(key.starts_with("snapshots/2023-12-01/"));
    }
}
