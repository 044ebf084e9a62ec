/// Profile endpoints for the authenticated user
///
/// - `PATCH /api/update` - Update username, email, and/or password
/// - `DELETE /api/update` - Delete the account and the todos it owns

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{hash_password, MessageResponse},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tickoff_shared::{
    auth::middleware::AuthContext,
    models::user::{UpdateUser, User},
};
use tracing::info;
use validator::Validate;

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1 to 64 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New plaintext password, re-hashed before it is stored
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Update response
#[derive(Debug, Serialize)]
pub struct UpdateUserResponse {
    pub message: String,
    pub user: User,
}

/// Updates the caller's profile
///
/// # Errors
///
/// - `400 Bad Request`: No fields, invalid fields, or a username/email that
///   belongs to another account
/// - `401 Unauthorized`: No valid cookie
/// - `404 Not Found`: The account no longer exists
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateUserResponse>> {
    let Json(req) = payload?;

    if req.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    req.validate()?;

    let password_hash = match req.password {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };

    let changes = UpdateUser {
        username: req.username,
        email: req.email.map(|email| email.to_lowercase()),
        password_hash,
    };

    let user = state
        .store
        .update_user(auth.user_id, changes)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, "User profile updated");

    Ok(Json(UpdateUserResponse {
        message: "User updated successfully".to_string(),
        user,
    }))
}

/// Deletes the caller's account and clears the credential cookie
///
/// Todos in the caller's reference set are deleted with the account; ids
/// that no longer resolve are ignored.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Response> {
    let user = state
        .store
        .delete_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %user.id, todos = user.todos.len(), "User deleted");

    let cookie = state
        .cookie
        .clear_cookie_header()
        .ok_or_else(|| ApiError::InternalError("Invalid cookie attributes".to_string()))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("User deleted successfully")),
    )
        .into_response())
}
