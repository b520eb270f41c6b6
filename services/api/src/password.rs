//! Password digests
//!
//! Passwords are stored as the Base64 encoding of an HMAC-SHA512 digest
//! keyed with a server-side secret. Verification re-hashes the candidate
//! and compares digests; plaintext is never stored or compared.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha512;

type HmacSha512 = Hmac<Sha512>;

/// Digest a password with the server secret
pub fn hash_password(password: &str, secret: &str) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Check a candidate password against a stored digest
pub fn verify_password(password: &str, secret: &str, digest: &str) -> bool {
    hash_password(password, secret) == digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        let a = hash_password("hunter22", "server-secret");
        let b = hash_password("hunter22", "server-secret");
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_depends_on_secret() {
        let a = hash_password("hunter22", "secret-a");
        let b = hash_password("hunter22", "secret-b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_is_base64_of_sha512_digest() {
        let digest = hash_password("hunter22", "server-secret");
        let raw = STANDARD.decode(&digest).expect("digest is not valid base64");
        assert_eq!(raw.len(), 64);
    }

    #[test]
    fn test_verify_round_trip() {
        let digest = hash_password("hunter22", "server-secret");
        assert!(verify_password("hunter22", "server-secret", &digest));
        assert!(!verify_password("hunter23", "server-secret", &digest));
        assert!(!verify_password("hunter22", "other-secret", &digest));
    }
}
