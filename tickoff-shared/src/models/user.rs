/// User model
///
/// A user owns an ordered list of todo ids (`todos`), the reference set that
/// every ownership check consults.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     username VARCHAR(64) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     todos UUID[] NOT NULL DEFAULT '{}',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// `password_hash` is an Argon2id PHC string and is never serialized, so a
/// `User` can be returned to clients as-is.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Unique display name
    pub username: String,

    /// Unique email address, stored lower-cased
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Ids of the todos this user owns, in creation order
    pub todos: Vec<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether `todo_id` is in this user's reference set
    pub fn owns_todo(&self, todo_id: Uuid) -> bool {
        self.todos.contains(&todo_id)
    }

    /// Applies a partial update in place and bumps `updated_at`
    pub fn apply(&mut self, data: UpdateUser) {
        if let Some(username) = data.username {
            self.username = username;
        }
        if let Some(email) = data.email {
            self.email = email;
        }
        if let Some(password_hash) = data.password_hash {
            self.password_hash = password_hash;
        }
        self.updated_at = Utc::now();
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Already lower-cased
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

/// Input for updating an existing user
///
/// Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}
