/// Authentication endpoints
///
/// This module provides account authentication endpoints:
/// - Registration
/// - Login (sets the credential cookie)
/// - Logout (clears it)
///
/// # Endpoints
///
/// - `POST /api/register` - Register new user
/// - `POST /api/login` - Login and receive the `token` cookie
/// - `POST /api/logout` - Drop the `token` cookie

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{hash_password, verify_password, MessageResponse},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tickoff_shared::models::user::{CreateUser, User};
use tracing::{info, warn};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique display name
    #[validate(length(min = 1, max = 64, message = "Username must be 1 to 64 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before it is stored
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

/// Login request
///
/// Not validated: a malformed email simply matches no account.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
///
/// `userInfo` is a serialized `User`, which never includes the password hash.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,

    #[serde(rename = "userInfo")]
    pub user_info: User,

    pub token: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// Content-Type: application/json
///
/// {
///   "username": "bob",
///   "email": "bob@x.com",
///   "password": "pw1"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, validation failed, or the username
///   or email is already taken
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let password_hash = hash_password(req.password).await?;

    let user = state
        .store
        .create_user(CreateUser {
            username: req.username,
            email: req.email.to_lowercase(),
            password_hash,
        })
        .await?;

    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

/// Login endpoint
///
/// Verifies the password, then mints a token and sets it as the HttpOnly
/// `token` cookie. The token is also returned in the body.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not a JSON login request
/// - `401 Unauthorized`: Unknown or malformed email, or wrong password (same message for
///   both; no token is minted)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = payload?;

    let email = req.email.to_lowercase();

    let user = match state.store.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            warn!(email = %email, "Login attempt for unknown email");
            return Err(invalid_credentials());
        }
    };

    if !verify_password(req.password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(invalid_credentials());
    }

    let token = state.tokens.issue(user.id, &user.email)?;

    let cookie = state
        .cookie
        .set_cookie_header(&token)
        .ok_or_else(|| ApiError::InternalError("Token is not a valid cookie value".to_string()))?;

    info!(user_id = %user.id, "User logged in");

    let body = Json(LoginResponse {
        message: "Login successful".to_string(),
        user_info: user,
        token,
    });

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

/// Logout endpoint
///
/// Tells the browser to drop the credential cookie. Tokens are not revoked
/// server-side, so a copied token stays valid.
pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = state
        .cookie
        .clear_cookie_header()
        .ok_or_else(|| ApiError::InternalError("Invalid cookie attributes".to_string()))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("Logged out successfully")),
    )
        .into_response())
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}
