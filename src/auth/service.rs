//! Credential primitives: password hash/verify, email syntax, verification tokens.

use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::sync::OnceLock;
use validator::ValidateEmail;

/// Random bytes in a verification token (256 bits).
const VERIFICATION_TOKEN_BYTES: usize = 32;

pub struct AuthAppService;

impl AuthAppService {
    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    /// Constant-time comparison of `password` against a stored PHC hash string.
    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Spend the same Argon2 work as a real check when no account matches, so login
    /// timing does not reveal which emails are registered. Always "fails".
    pub fn verify_against_dummy(password: &str) {
        let _ = Self::verify_password(password, dummy_hash());
    }

    /// `local@domain.tld`: RFC-ish syntax check plus a dotted domain.
    pub fn validate_email(email: &str) -> AppResult<()> {
        let dotted_domain = email
            .rsplit_once('@')
            .and_then(|(_, domain)| domain.rsplit_once('.'))
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
        if !dotted_domain || !email.validate_email() {
            return Err(AppError::InvalidInput("Invalid email address".to_string()));
        }
        Ok(())
    }

    pub fn validate_password(password: &str, min_length: usize) -> AppResult<()> {
        if password.chars().count() < min_length {
            return Err(AppError::WeakCredential { min: min_length });
        }
        Ok(())
    }

    /// URL-safe single-use token from the OS RNG, hex encoded.
    pub fn generate_verification_token() -> String {
        let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

/// Argon2 hash of a random secret nobody knows, with the same parameters as real hashes.
fn dummy_hash() -> &'static str {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    DUMMY_HASH.get_or_init(|| {
        AuthAppService::hash_password(&AuthAppService::generate_verification_token())
            .unwrap_or_default()
    })
}

/// Trim and lowercase so lookups and the uniqueness constraint see one spelling.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hash = AuthAppService::hash_password("mypassword").unwrap();
        assert_ne!(hash, "mypassword");
        assert!(AuthAppService::verify_password("mypassword", &hash).unwrap());
        assert!(!AuthAppService::verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = AuthAppService::hash_password("secret1").unwrap();
        let b = AuthAppService::hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        // parses, so the unknown-account path runs the full comparison instead of bailing out
        let parsed = PasswordHash::new(dummy_hash()).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!AuthAppService::verify_password("secret1", dummy_hash()).unwrap());
        assert_eq!(dummy_hash(), dummy_hash());
        AuthAppService::verify_against_dummy("secret1");
    }

    #[test]
    fn validate_email_accepts_valid() {
        assert!(AuthAppService::validate_email("user@example.com").is_ok());
        assert!(AuthAppService::validate_email("a@b.co").is_ok());
    }

    #[test]
    fn validate_email_rejects_invalid() {
        assert!(AuthAppService::validate_email("invalid").is_err());
        assert!(AuthAppService::validate_email("@nodomain").is_err());
        assert!(AuthAppService::validate_email("user@localhost").is_err());
        assert!(AuthAppService::validate_email("user@domain.").is_err());
        assert!(AuthAppService::validate_email("").is_err());
    }

    #[test]
    fn password_length_boundary() {
        assert!(AuthAppService::validate_password("123456", 6).is_ok());
        assert!(matches!(
            AuthAppService::validate_password("12345", 6),
            Err(AppError::WeakCredential { min: 6 })
        ));
        // counted in characters, not bytes
        assert!(AuthAppService::validate_password("ééééé", 6).is_err());
    }

    #[test]
    fn verification_tokens_are_url_safe_and_unique() {
        let a = AuthAppService::generate_verification_token();
        let b = AuthAppService::generate_verification_token();
        assert_eq!(a.len(), VERIFICATION_TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  A@B.Com "), "a@b.com");
    }
}
