/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Liveness text and store health check
/// - `auth`: Registration, login, logout
/// - `users`: Profile update and account deletion
/// - `todos`: Todo CRUD scoped to the owning user

pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

use crate::error::ApiResult;
use serde::Serialize;
use tickoff_shared::auth::password;

/// Body carrying only a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hashes a password off the async runtime
///
/// Argon2 with 64 MB of memory takes long enough to stall a worker thread.
pub(crate) async fn hash_password(plaintext: String) -> ApiResult<String> {
    let hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext)).await??;
    Ok(hash)
}

/// Verifies a password off the async runtime
pub(crate) async fn verify_password(plaintext: String, hash: String) -> ApiResult<bool> {
    let valid =
        tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash)).await?;
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocking_hash_round_trip() {
        let hash = hash_password("pw1".to_string()).await.unwrap();

        assert!(verify_password("pw1".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("pw2".to_string(), hash).await.unwrap());
    }
}
