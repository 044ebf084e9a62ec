/// Password hashing module using Argon2id
///
/// Credentials are stored as Argon2id PHC strings. Every hash carries its own
/// random salt and cost parameters, so hashing the same password twice yields
/// two different strings and verification needs nothing but the stored value.
///
/// # Parameters
///
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// Hashing is deliberately slow. Async callers should run it on
/// `tokio::task::spawn_blocking` rather than on a runtime worker.
///
/// # Example
///
/// ```
/// use tickoff_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("pw1")?;
///
/// assert!(verify_password("pw1", &hash));
/// assert!(!verify_password("pw2", &hash));
/// assert!(!verify_password("pw1", "not-a-phc-string"));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use tracing::warn;

const MEMORY_COST_KB: u32 = 65536;
const TIME_COST: u32 = 3;
const PARALLELISM: u32 = 4;
const OUTPUT_LEN: usize = 32;

/// Error type for password hashing
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Argon2 parameters were rejected
    #[error("Invalid hashing parameters: {0}")]
    Params(String),

    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Hashes a password using Argon2id
///
/// Returns a PHC string such as
/// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
///
/// # Errors
///
/// Returns `PasswordError` only if the hasher itself fails, never because of
/// the password's content (empty passwords hash fine; rejecting them is the
/// caller's job).
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(MEMORY_COST_KB)
        .t_cost(TIME_COST)
        .p_cost(PARALLELISM)
        .output_len(OUTPUT_LEN)
        .build()
        .map_err(|e| PasswordError::Params(e.to_string()))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Comparison is constant-time. Any failure, including a hash that cannot be
/// parsed, is reported as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is malformed");
            return false;
        }
    };

    // Parameters are read back from the PHC string
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => true,
        Err(argon2::password_hash::Error::Password) => false,
        Err(e) => {
            warn!(error = %e, "Password verification failed");
            false
        }
    }
}
