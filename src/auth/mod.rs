//! Password hashing and opaque token minting.
//!
//! Tokens are 40 hex characters, minted once per user and stable for the
//! account's lifetime; the mapping lives in the auth_tokens table.

use sha2::{Digest, Sha256};
use uuid::Uuid;

const HASH_ALGORITHM: &str = "sha256";
const SALT_LENGTH: usize = 16;
const TOKEN_LENGTH: usize = 40;

/// Hash a password into the stored `sha256$<salt>$<hex>` format
pub fn hash_password(password: &str) -> String {
    let salt_material = format!("{:x}", Sha256::digest(Uuid::new_v4().as_bytes()));
    let salt = &salt_material[..SALT_LENGTH];
    format!("{}${}${}", HASH_ALGORITHM, salt, digest_with_salt(salt, password))
}

/// Check a candidate password against a stored hash string
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(HASH_ALGORITHM), Some(salt), Some(expected)) => {
            digest_with_salt(salt, password) == expected
        }
        _ => false,
    }
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Mint a fresh opaque token candidate from random material
pub fn generate_token() -> String {
    let mut hasher = Sha256::new();
    hasher.update(Uuid::new_v4().as_bytes());
    hasher.update(Uuid::new_v4().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..TOKEN_LENGTH].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips() {
        let stored = hash_password("correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &stored));
        assert!(!verify_password("wrong password", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "md5$salt$digest"));
        assert!(!verify_password("anything", "notevenclose"));
    }

    #[test]
    fn tokens_are_40_hex_chars_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
