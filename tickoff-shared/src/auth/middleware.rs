/// Authentication middleware for Axum
///
/// Reads the identity token from the credential cookie, verifies it, and
/// adds an [`AuthContext`] to the request extensions. Requests without a
/// valid token are answered with `401 Unauthorized` and never reach the
/// handler.
///
/// The gate keeps no per-request state; the only shared data is the
/// read-only [`TokenSigner`].
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use std::sync::Arc;
/// use tickoff_shared::auth::jwt::TokenSigner;
/// use tickoff_shared::auth::middleware::{cookie_auth, AuthContext, AuthGate};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.email
/// }
///
/// let gate = AuthGate::new(Arc::new(TokenSigner::new("secret", None)));
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .route_layer(middleware::from_fn_with_state(gate, cookie_auth));
/// ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::cookie::{extract_cookie, TOKEN_COOKIE};
use super::jwt::{Claims, JwtError, TokenSigner};

/// Identity attached to authenticated requests
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Why a request was rejected by the gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credential cookie on the request
    #[error("Missing credentials")]
    MissingCredentials,

    /// Cookie present but the token did not verify
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        debug!(reason = %self, "Rejected unauthenticated request");

        // Callers learn only that they are not authenticated
        let body = Json(json!({
            "error": "unauthorized",
            "message": "Unauthorized",
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Middleware state: the verifier plus the cookie it reads
#[derive(Debug, Clone)]
pub struct AuthGate {
    signer: Arc<TokenSigner>,
    cookie_name: String,
}

impl AuthGate {
    /// Gate reading the default `token` cookie
    pub fn new(signer: Arc<TokenSigner>) -> Self {
        Self {
            signer,
            cookie_name: TOKEN_COOKIE.to_string(),
        }
    }

    /// Reads the token from a differently named cookie
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Decides AUTHORIZED / REJECTED for a set of request headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
        let token =
            extract_cookie(headers, &self.cookie_name).ok_or(AuthError::MissingCredentials)?;

        let claims = self.signer.verify(&token)?;

        Ok(AuthContext::from(claims))
    }
}

/// Cookie authentication middleware
///
/// Use with `axum::middleware::from_fn_with_state(gate, cookie_auth)`.
pub async fn cookie_auth(
    State(gate): State<AuthGate>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = gate.authenticate(req.headers())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header, middleware, routing::get, Extension, Router};
    use tower::Service as _;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
        auth.user_id.to_string()
    }

    fn app(signer: Arc<TokenSigner>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(
                AuthGate::new(signer),
                cookie_auth,
            ))
    }

    fn request(cookie: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let context = AuthContext::from(Claims::new(user_id, "bob@x.com"));

        assert_eq!(context.user_id, user_id);
        assert_eq!(context.email, "bob@x.com");
    }

    #[test]
    fn test_authenticate_outcomes() {
        let signer = Arc::new(TokenSigner::new(SECRET, None));
        let gate = AuthGate::new(signer.clone());
        let user_id = Uuid::new_v4();
        let token = signer.issue(user_id, "bob@x.com").unwrap();

        let mut headers = HeaderMap::new();
        assert!(matches!(
            gate.authenticate(&headers),
            Err(AuthError::MissingCredentials)
        ));

        headers.insert(header::COOKIE, "token=garbage".parse().unwrap());
        assert!(matches!(
            gate.authenticate(&headers),
            Err(AuthError::InvalidToken(_))
        ));

        headers.insert(header::COOKIE, format!("token={}", token).parse().unwrap());
        assert_eq!(gate.authenticate(&headers).unwrap().user_id, user_id);
    }

    #[test]
    fn test_custom_cookie_name() {
        let signer = Arc::new(TokenSigner::new(SECRET, None));
        let gate = AuthGate::new(signer.clone()).with_cookie_name("sid");
        let token = signer.issue(Uuid::new_v4(), "a@x.com").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, format!("token={}", token).parse().unwrap());
        assert!(gate.authenticate(&headers).is_err());

        headers.insert(header::COOKIE, format!("sid={}", token).parse().unwrap());
        assert!(gate.authenticate(&headers).is_ok());
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken(JwtError::Expired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_rejects_without_cookie() {
        let signer = Arc::new(TokenSigner::new(SECRET, None));
        let response = app(signer).call(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_rejects_foreign_signature() {
        let signer = Arc::new(TokenSigner::new(SECRET, None));
        let forger = TokenSigner::new("another-secret-another-secret-another", None);
        let forged = forger.issue(Uuid::new_v4(), "evil@x.com").unwrap();

        let response = app(signer)
            .call(request(Some(&format!("token={}", forged))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_middleware_attaches_identity() {
        let signer = Arc::new(TokenSigner::new(SECRET, None));
        let user_id = Uuid::new_v4();
        let token = signer.issue(user_id, "bob@x.com").unwrap();

        let response = app(signer)
            .call(request(Some(&format!("theme=dark; token={}", token))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, user_id.to_string().as_bytes());
    }
}
