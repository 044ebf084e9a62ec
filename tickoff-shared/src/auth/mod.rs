/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: identity token issuing and verification
/// - [`cookie`]: the credential cookie
/// - [`middleware`]: the Axum gate that turns a cookie into an `AuthContext`
/// - [`ownership`]: per-user todo ownership checks
///
/// # Example
///
/// ```
/// use tickoff_shared::auth::jwt::TokenSigner;
/// use tickoff_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("pw1")?;
/// assert!(verify_password("pw1", &hash));
///
/// let signer = TokenSigner::new("a-secret-that-is-at-least-32-bytes!", None);
/// let token = signer.issue(Uuid::new_v4(), "bob@x.com")?;
/// assert!(signer.verify(&token).is_ok());
/// # Ok(())
/// # }
/// ```

pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod ownership;
pub mod password;
