//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// File extension as reported to the client, dot included
fn file_extension(file_name: &str) -> &str {
    file_name
        .rfind('.')
        .filter(|&i| i > 0)
        .map(|i| &file_name[i..])
        .unwrap_or("")
}

/// Validate an image upload by its declared content type
///
/// Only jpg, jpeg and png are accepted. The error message names the
/// uploaded file's extension, not its content type.
pub fn validate_image_upload(content_type: &str, file_name: &str) -> Result<(), String> {
    static IMAGE_MIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = IMAGE_MIME_REGEX
        .get_or_init(|| Regex::new(r"/(jpg|jpeg|png)$").expect("Failed to compile mime regex"));

    if regex.is_match(content_type) {
        Ok(())
    } else {
        Err(format!("Unsupported file type {}", file_extension(file_name)))
    }
}

/// Validate a model snapshot upload by file name
pub fn validate_snapshot_upload(file_name: &str) -> Result<(), String> {
    if file_name.contains(".pth") {
        Ok(())
    } else {
        Err(format!("Unsupported file type {}", file_extension(file_name)))
    }
}

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 5 {
        return Err("Password must be at least 5 characters long".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_image_types_pass() {
        assert!(validate_image_upload("image/jpg", "a.jpg").is_ok());
        assert!(validate_image_upload("image/jpeg", "a.jpeg").is_ok());
        assert!(validate_image_upload("image/png", "a.png").is_ok());
    }

    #[test]
    fn test_unsupported_image_type_names_extension() {
        let err = validate_image_upload("image/gif", "banner.gif").unwrap_err();
        assert_eq!(err, "Unsupported file type .gif");
    }

    #[test]
    fn test_extension_only_matches_mime_suffix() {
        // The check runs against the content type, not the file name.
        assert!(validate_image_upload("video/mp4", "clip.png").is_err());
        assert!(validate_image_upload("image/png", "clip.mp4").is_ok());
    }

    #[test]
    fn test_missing_extension_yields_bare_message() {
        let err = validate_image_upload("application/pdf", "document").unwrap_err();
        assert_eq!(err, "Unsupported file type ");
    }

    #[test]
    fn test_snapshot_accepts_pth_anywhere_in_name() {
        assert!(validate_snapshot_upload("weights.pth").is_ok());
        assert!(validate_snapshot_upload("weights.pth.tar").is_ok());
        assert!(validate_snapshot_upload("weights.onnx").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(validate_password("1234").is_err());
        assert!(validate_password("12345").is_ok());
    }

    #[test]
    fn test_username_required() {
        assert!(validate_username("").is_err());
        assert!(validate_username("phuong").is_ok());
    }
}
