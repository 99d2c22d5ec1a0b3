use crate::errors::{AppError, Result};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub struct PasswordManager;

impl PasswordManager {
    pub fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

        Ok(password_hash.to_string())
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::InternalError(format!("Invalid password hash: {}", e)))?;

        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(_) => Ok(false),
        }
    }
}

pub struct TokenManager;

impl TokenManager {
    /// 32 random bytes, hex-encoded. Used for deck share links.
    pub fn generate_share_token() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Digest stored in place of a bearer token so a leaked database does
    /// not leak live sessions.
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip_verifies() {
        let hash = PasswordManager::hash_password("Str0ng!pass").unwrap();
        assert!(PasswordManager::verify_password("Str0ng!pass", &hash).unwrap());
        assert!(!PasswordManager::verify_password("Wr0ng!pass", &hash).unwrap());
    }

    #[test]
    fn share_tokens_are_64_hex_chars_and_unique() {
        let a = TokenManager::generate_share_token();
        let b = TokenManager::generate_share_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn token_hash_is_stable() {
        assert_eq!(TokenManager::hash_token("abc"), TokenManager::hash_token("abc"));
        assert_ne!(TokenManager::hash_token("abc"), TokenManager::hash_token("abd"));
    }
}
