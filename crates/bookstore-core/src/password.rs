//! Password hashing and verification.
//!
//! Passwords are hashed with bcrypt using a configurable work factor. Each
//! hash carries its own random salt, so hashing the same password twice
//! yields different strings.
//!
//! Verification never surfaces an error: a mismatch, a malformed stored hash,
//! or a failed worker thread all read as "not verified". bcrypt compares
//! digests in constant time.
//!
//! bcrypt only reads the first [`MAX_PASSWORD_BYTES`] bytes of its input.
//! Longer passwords are refused outright instead of being silently cut, so
//! two passwords sharing a 72-byte prefix never verify against each other.
//!
//! Both operations are CPU-bound, so the async variants move the
//! work onto tokio's blocking pool.

use std::fmt;
use std::sync::Arc;

use anyhow::anyhow;

use crate::errors::AppError;

/// Lowest work factor bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Longest password, in bytes, bcrypt can hash without truncating it.
pub const MAX_PASSWORD_BYTES: usize = 72;

const DUMMY_PASSWORD: &str = "bookstore-dummy-password";

#[derive(Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    /// Creates a hasher for the given work factor.
    ///
    /// A reference hash is computed up front so that [`verify_dummy`]
    /// costs exactly as much as a real verification.
    ///
    /// [`verify_dummy`]: PasswordHasher::verify_dummy
    pub fn new(cost: u32) -> Result<Self, AppError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AppError::internal(anyhow!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_COST,
                MAX_COST,
                cost
            )));
        }

        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost)
            .map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))?;

        Ok(Self {
            cost,
            dummy_hash: dummy_hash.into(),
        })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash_blocking(&self, password: &str) -> Result<String, AppError> {
        bcrypt::non_truncating_hash(password, self.cost)
            .map_err(|e| AppError::internal(anyhow!("Failed to hash password: {}", e)))
    }

    pub fn verify_blocking(&self, password: &str, hash: &str) -> bool {
        bcrypt::non_truncating_verify(password, hash).unwrap_or(false)
    }

    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash_blocking(&password))
            .await
            .map_err(|e| AppError::internal(anyhow!("Password hashing task failed: {}", e)))?
    }

    pub async fn verify(&self, password: &str, hash: &str) -> bool {
        let hasher = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify_blocking(&password, &hash))
            .await
            .unwrap_or(false)
    }

    /// Runs a verification whose result is thrown away.
    ///
    /// Used when there is no stored hash to check against, so that the
    /// caller's latency does not reveal whether a record exists.
    pub async fn verify_dummy(&self, password: &str) {
        let dummy_hash = self.dummy_hash.clone();
        let _ = self.verify(password, &dummy_hash).await;
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(MIN_COST).unwrap()
    }

    #[test]
    fn test_hash_password_success() {
        let password = "testpassword123";
        let hash = hasher().hash_blocking(password).unwrap();

        assert!(!hash.is_empty());
        assert_ne!(hash, password);
    }

    #[test]
    fn test_verify_password_correct() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("correctpassword").unwrap();

        assert!(hasher.verify_blocking("correctpassword", &hash));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("correctpassword").unwrap();

        assert!(!hasher.verify_blocking("wrongpassword", &hash));
    }

    #[test]
    fn test_verify_password_malformed_hash_is_false() {
        let hasher = hasher();

        assert!(!hasher.verify_blocking("testpassword", "not_a_valid_bcrypt_hash"));
        assert!(!hasher.verify_blocking("testpassword", ""));
        assert!(!hasher.verify_blocking("testpassword", "$2b$04$short"));
    }

    #[test]
    fn test_hash_generates_unique_hashes() {
        let hasher = hasher();
        let hash1 = hasher.hash_blocking("samepassword").unwrap();
        let hash2 = hasher.hash_blocking("samepassword").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_blocking("samepassword", &hash1));
        assert!(hasher.verify_blocking("samepassword", &hash2));
    }

    #[test]
    fn test_hash_uses_configured_cost() {
        let hash = PasswordHasher::new(5).unwrap().hash_blocking("pw").unwrap();
        assert!(hash.starts_with("$2b$05$"));
    }

    #[test]
    fn test_cost_out_of_range_rejected() {
        assert!(PasswordHasher::new(3).is_err());
        assert!(PasswordHasher::new(32).is_err());
    }

    #[test]
    fn test_verify_case_sensitive() {
        let hasher = hasher();
        let hash = hasher.hash_blocking("Password123").unwrap();

        assert!(!hasher.verify_blocking("password123", &hash));
        assert!(!hasher.verify_blocking("PASSWORD123", &hash));
    }

    #[test]
    fn test_shared_long_prefix_does_not_verify() {
        let hasher = hasher();
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hasher.hash_blocking(&prefix).unwrap();

        assert!(hasher.verify_blocking(&prefix, &hash));
        assert!(!hasher.verify_blocking(&format!("{}WRONG", prefix), &hash));
    }

    #[test]
    fn test_overlong_password_rejected() {
        let hasher = hasher();
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let long = format!("{}correct-tail", prefix);
        let hash = hasher.hash_blocking(&prefix).unwrap();

        assert!(hasher.hash_blocking(&long).is_err());
        assert!(!hasher.verify_blocking(&long, &hash));
    }

    #[test]
    fn test_debug_hides_dummy_hash() {
        let rendered = format!("{:?}", hasher());
        assert!(rendered.contains("cost: 4"));
        assert!(!rendered.contains("$2b$"));
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let hasher = hasher();
        let hash = hasher.hash("secret1").await.unwrap();

        assert!(hasher.verify("secret1", &hash).await);
        assert!(!hasher.verify("secret2", &hash).await);
    }

    #[tokio::test]
    async fn test_verify_dummy_completes() {
        hasher().verify_dummy("anything").await;
    }
}
