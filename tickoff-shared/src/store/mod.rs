/// Persistence interfaces
///
/// Handlers talk to storage only through these traits. Two back-ends
/// implement them:
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx, the production store
/// - [`memory::MemoryStore`]: in-process maps, used by tests and local runs
///
/// Every method is a single suspend point; none of them hold state across
/// calls, so handlers never block one another.
///
/// # Example
///
/// ```
/// use tickoff_shared::models::todo::CreateTodo;
/// use tickoff_shared::models::user::CreateUser;
/// use tickoff_shared::store::{memory::MemoryStore, TodoStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store
///     .create_user(CreateUser {
///         username: "bob".into(),
///         email: "bob@x.com".into(),
///         password_hash: "$argon2id$...".into(),
///     })
///     .await?;
///
/// let todo = store
///     .create_todo(CreateTodo { title: "buy milk".into(), description: None })
///     .await?;
/// store.push_todo_ref(user.id, todo.id).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    todo::{CreateTodo, Todo, UpdateTodo},
    user::{CreateUser, UpdateUser, User},
};

pub mod memory;
pub mod postgres;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field (`email`, `username`) already holds this value
    #[error("Duplicate value for unique field `{0}`")]
    Conflict(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credential store: users and their todo reference sets
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user with an empty reference set
    ///
    /// Fails with `StoreError::Conflict` when the username or email is taken.
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact match on the (already lower-cased) email
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Writes the `Some` fields of `data`; `None` if the user doesn't exist
    async fn update_user(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Deletes a user together with every todo in its reference set
    ///
    /// Returns the deleted user, `None` if there was none. Dangling ids in
    /// the reference set are ignored.
    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Appends `todo_id` to the user's reference set in one atomic step
    async fn push_todo_ref(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<User>>;

    /// Removes every occurrence of `todo_id` from the user's reference set
    async fn pull_todo_ref(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<User>>;
}

/// Todo store
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Creates an incomplete todo
    async fn create_todo(&self, data: CreateTodo) -> StoreResult<Todo>;

    async fn find_todo_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>>;

    /// Resolves ids in the given order, skipping ids with no record
    async fn find_todos_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Todo>>;

    async fn update_todo(&self, id: Uuid, data: UpdateTodo) -> StoreResult<Option<Todo>>;

    /// Deletes a todo and returns it. Does not touch any reference set.
    async fn delete_todo(&self, id: Uuid) -> StoreResult<Option<Todo>>;
}

/// Everything the API needs from persistence
#[async_trait]
pub trait Store: UserStore + TodoStore {
    /// Cheap connectivity check for health reporting
    async fn ping(&self) -> StoreResult<()>;

    /// Short name of the back-end, for logs
    fn backend(&self) -> &'static str;
}

/// Orders `todos` by their position in `ids`, dropping records not listed
pub(crate) fn order_by_ids(ids: &[Uuid], mut todos: Vec<Todo>) -> Vec<Todo> {
    let mut ordered = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(pos) = todos.iter().position(|t| t.id == *id) {
            ordered.push(todos.swap_remove(pos));
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn todo(id: Uuid) -> Todo {
        let now = Utc::now();
        Todo {
            id,
            title: id.to_string(),
            description: None,
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_order_by_ids_follows_reference_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let fetched = vec![todo(c), todo(a), todo(b)];

        let ordered = order_by_ids(&[a, b, c], fetched);
        let ids: Vec<Uuid> = ordered.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn test_order_by_ids_skips_dangling() {
        let (a, missing) = (Uuid::new_v4(), Uuid::new_v4());

        let ordered = order_by_ids(&[missing, a], vec![todo(a)]);
        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].id, a);
    }
}
