/// Ownership checks for todo access
///
/// A todo belongs to whoever lists its id in their reference set. Before any
/// read or mutation of a specific todo, handlers run
/// [`require_todo_owner`], which distinguishes three failures:
///
/// 1. The authenticated user no longer exists → `UserNotFound`
/// 2. The id is not in the user's reference set → `NotOwner`, even when the
///    todo exists and belongs to someone else
/// 3. The id is referenced but the record is gone → `TodoNotFound`
///
/// # Example
///
/// ```no_run
/// use tickoff_shared::auth::ownership::require_todo_owner;
/// use tickoff_shared::store::Store;
/// use uuid::Uuid;
///
/// # async fn example(store: &dyn Store, user_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let owned = require_todo_owner(store, user_id, "6f1c5a1e-0b7a-4f51-9f5e-2f64b0c7d0a1").await?;
/// println!("{} owns {}", owned.user.username, owned.todo.title);
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use crate::models::{todo::Todo, user::User};
use crate::store::{Store, StoreError};

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// The authenticated identity has no user record
    #[error("User {0} not found")]
    UserNotFound(Uuid),

    /// The todo id is not in the caller's reference set
    #[error("Todo {0} does not belong to the caller")]
    NotOwner(String),

    /// Referenced by the caller, but the record is gone
    #[error("Todo {0} not found")]
    TodoNotFound(Uuid),

    /// Store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A todo together with the user it was checked against
#[derive(Debug, Clone)]
pub struct OwnedTodo {
    pub user: User,
    pub todo: Todo,
}

/// Loads the user behind an authenticated identity
pub async fn require_user(store: &dyn Store, user_id: Uuid) -> Result<User, OwnershipError> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or(OwnershipError::UserNotFound(user_id))
}

/// Checks that `user_id` owns the todo identified by `todo_id`
///
/// `todo_id` is the raw path segment. A value that is not a UUID can never
/// be in a reference set, so it fails the ownership step rather than being
/// reported as malformed input.
pub async fn require_todo_owner(
    store: &dyn Store,
    user_id: Uuid,
    todo_id: &str,
) -> Result<OwnedTodo, OwnershipError> {
    let user = require_user(store, user_id).await?;

    let todo_id = match Uuid::parse_str(todo_id) {
        Ok(id) if user.owns_todo(id) => id,
        _ => return Err(OwnershipError::NotOwner(todo_id.to_string())),
    };

    let todo = store
        .find_todo_by_id(todo_id)
        .await?
        .ok_or(OwnershipError::TodoNotFound(todo_id))?;

    Ok(OwnedTodo { user, todo })
}
