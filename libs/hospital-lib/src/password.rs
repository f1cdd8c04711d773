//! One-way password hashing.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
pub const DEFAULT_BCRYPT_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl BcryptPasswordHasher {
    /// Costs outside bcrypt's accepted range are clamped into it.
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordHashError(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(plaintext, hash).map_err(|e| PasswordHashError(e.to_string()))
    }
}

/// Runs the hasher on the blocking pool, inside the caller's span.
pub async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    password: SecretString,
) -> Result<String, PasswordHashError> {
    let current_span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| hasher.hash(password.expose_secret()))
    })
    .await
    .map_err(|e| PasswordHashError(e.to_string()))?
}

pub async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    password: SecretString,
    hash: String,
) -> Result<bool, PasswordHashError> {
    let current_span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| hasher.verify(password.expose_secret(), &hash))
    })
    .await
    .map_err(|e| PasswordHashError(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = BcryptPasswordHasher::new(MIN_BCRYPT_COST);
        let hashed = hasher.hash("secure_password_123").unwrap();

        assert_ne!(hashed, "secure_password_123");
        assert!(hasher.verify("secure_password_123", &hashed).unwrap());
        assert!(!hasher.verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(BcryptPasswordHasher::new(0).cost(), MIN_BCRYPT_COST);
        assert_eq!(BcryptPasswordHasher::new(99).cost(), MAX_BCRYPT_COST);
    }

    #[tokio::test]
    async fn test_async_helpers_round_trip() {
        let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new(MIN_BCRYPT_COST));
        let hash = hash_password(hasher.clone(), SecretString::new("1234".to_string()))
            .await
            .unwrap();
        assert!(verify_password(hasher, SecretString::new("1234".to_string()), hash)
            .await
            .unwrap());
    }
}
