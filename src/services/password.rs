//! Admin password hashing.
//!
//! New passwords are stored as bcrypt hashes. A bare 64-char hex digest
//! (unsalted SHA-256) is still accepted so that accounts created before
//! bcrypt keep working until their password is reset.

use std::sync::LazyLock;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{AppError, AppResult};

const LEGACY_DIGEST_LEN: usize = 64;

/// Verified against when the username does not exist, so both failure paths
/// cost one bcrypt verification.
static DECOY_HASH: LazyLock<String> =
    LazyLock::new(|| bcrypt::hash("decoy-password", bcrypt::DEFAULT_COST).unwrap_or_default());

/// Hash with the default bcrypt cost.
///
/// # Errors
///
/// Returns the bcrypt error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash_password_with_cost(password, bcrypt::DEFAULT_COST)
}

/// Hash with an explicit bcrypt cost. Low costs are for tests only.
///
/// # Errors
///
/// Returns the bcrypt error if the cost is out of range.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Blocking check of `password` against a stored bcrypt or legacy hash.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_legacy_digest(stored) {
        let actual = hex::encode(Sha256::digest(password.as_bytes()));
        return actual
            .as_bytes()
            .ct_eq(stored.to_ascii_lowercase().as_bytes())
            .into();
    }

    match bcrypt::verify(password, stored) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable admin password hash");
            false
        }
    }
}

/// Verify off the async executor. A missing account (`stored = None`) is
/// checked against a decoy hash and always fails.
///
/// # Errors
///
/// Returns `AppError::Internal` if the blocking task fails.
pub async fn check_password(password: String, stored: Option<String>) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || match stored {
        Some(stored) => verify_password(&password, &stored),
        None => {
            let _ = verify_password(&password, &DECOY_HASH);
            false
        }
    })
    .await
    .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == LEGACY_DIGEST_LEN && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_hash(password: &str) -> String {
        hash_password_with_cost(password, 4).unwrap()
    }

    #[test]
    fn bcrypt_hash_round_trips() {
        let stored = quick_hash("correct horse");
        assert!(stored.starts_with("$2"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("battery staple", &stored));
    }

    #[test]
    fn each_hash_gets_a_fresh_salt() {
        assert_ne!(quick_hash("same"), quick_hash("same"));
    }

    #[test]
    fn legacy_unsalted_digest_is_accepted() {
        // sha256("admin123")
        let legacy = "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9";
        assert!(verify_password("admin123", legacy));
        assert!(verify_password("admin123", &legacy.to_uppercase()));
        assert!(!verify_password("admin124", legacy));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("x", "zz$abcdef"));
        assert!(!verify_password("x", ""));
    }

    #[tokio::test]
    async fn missing_account_always_fails() {
        assert!(!check_password("anything".to_string(), None).await.unwrap());
        let stored = quick_hash("pw");
        assert!(check_password("pw".to_string(), Some(stored)).await.unwrap());
    }
}
