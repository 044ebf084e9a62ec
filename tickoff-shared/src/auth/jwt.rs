/// JWT token generation and validation module
///
/// Identity assertions are HS256-signed JWTs carrying the user id and email.
/// A [`TokenSigner`] owns both the encoding and the decoding key, derived from
/// one secret, so the issuing path and the verifying path always agree.
///
/// # Claims
///
/// - `sub`: user ID
/// - `email`: user email at the time of login
/// - `iss`: always `"tickoff"`
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: only present when the signer has a TTL
///
/// Without a TTL tokens never expire and there is no server-side revocation.
///
/// # Example
///
/// ```
/// use tickoff_shared::auth::jwt::TokenSigner;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = TokenSigner::new("a-secret-that-is-at-least-32-bytes!", None);
/// let user_id = Uuid::new_v4();
///
/// let token = signer.issue(user_id, "bob@x.com")?;
/// let claims = signer.verify(&token)?;
/// assert_eq!(claims.sub, user_id);
/// assert_eq!(claims.email, "bob@x.com");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Value of the `iss` claim on every token we mint
pub const ISSUER: &str = "tickoff";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// No token was presented
    #[error("Missing token")]
    Missing,

    /// Failed to create token
    #[error("Failed to create token: {0}")]
    Create(String),

    /// Token carried an `exp` that has passed
    #[error("Token has expired")]
    Expired,

    /// Signature does not match the configured secret
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was not issued by this service
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Anything else: bad encoding, wrong algorithm, missing claims
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Email of the authenticated user
    pub email: String,

    /// Issuer - Always "tickoff"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp), absent for time-unbounded tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// Creates claims without an expiration
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            sub: user_id,
            email: email.into(),
            iss: ISSUER.to_string(),
            iat: Utc::now().timestamp(),
            exp: None,
        }
    }

    /// Sets `exp` relative to `iat`
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.exp = Some(self.iat + ttl.num_seconds());
        self
    }
}

/// Issues and verifies identity tokens with a single HS256 secret
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Builds a signer from the configured secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Shared HMAC secret (at least 32 bytes in production)
    /// * `ttl` - Optional token lifetime; `None` mints tokens without `exp`
    pub fn new(secret: &str, ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        // `exp` is optional, but enforced whenever it is present
        validation.set_required_spec_claims(&["sub", "iss"]);
        validation.validate_exp = true;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Lifetime applied to newly issued tokens
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Mints a token for a user
    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, JwtError> {
        let mut claims = Claims::new(user_id, email);
        if let Some(ttl) = self.ttl {
            claims = claims.expires_in(ttl);
        }

        self.sign(&claims)
    }

    /// Signs arbitrary claims
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| JwtError::Create(e.to_string()))
    }

    /// Validates a token and extracts its claims
    ///
    /// Never panics: every failure mode maps to a `JwtError`.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(JwtError::Missing);
        }

        let token_data =
            decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => JwtError::Expired,
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                    _ => JwtError::Malformed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}
