//! Password hashing and verification (Argon2id, PHC strings).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::ApiError;

fn hash_blocking(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal {
            operation: format!("hash password: {e}"),
        })?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| ApiError::Internal {
        operation: format!("parse password hash: {e}"),
    })?;
    // Parameters come from the hash itself.
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hashes `password` on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| ApiError::Internal {
            operation: format!("join hashing task: {e}"),
        })?
}

/// Verifies `password` against a stored PHC hash on the blocking pool.
pub async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal {
            operation: format!("join verification task: {e}"),
        })?
}

/// Spends the same Argon2 work as `verify_password` when there is no stored hash
/// to check, so a login for an unknown email costs as much as a wrong password.
pub async fn simulate_verification(password: String) -> Result<(), ApiError> {
    hash_password(password).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_verification_runs_argon2() {
        let started = std::time::Instant::now();
        simulate_verification("Correct-Horse1!".to_string())
            .await
            .unwrap();
        assert!(!started.elapsed().is_zero());
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("Correct-Horse1!".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Correct-Horse1!".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("Wrong-Horse1!".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_an_error() {
        assert!(verify_password("whatever".to_string(), "not-a-hash".to_string()).await.is_err());
    }
}
