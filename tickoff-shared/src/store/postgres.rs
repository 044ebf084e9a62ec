/// PostgreSQL store
///
/// The document shape of the data is kept: a user row carries its todo
/// reference set as a `UUID[]` column, and todo rows know nothing about
/// their owner. Reference-set changes are single `UPDATE` statements
/// (`array_append` / `array_remove`), so concurrent todo creation for one
/// user cannot lose an id.
///
/// # Example
///
/// ```no_run
/// use tickoff_shared::db::pool::{create_pool, DatabaseConfig};
/// use tickoff_shared::store::{postgres::PgStore, UserStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// let user = store.find_user_by_email("bob@x.com").await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{order_by_ids, Store, StoreError, StoreResult, TodoStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    todo::{CreateTodo, Todo, UpdateTodo},
    user::{CreateUser, UpdateUser, User},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, todos, created_at, updated_at";
const TODO_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Turns unique violations into `StoreError::Conflict` naming the field
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("email") => "email",
                Some(c) if c.contains("username") => "username",
                _ => "unknown",
            };
            return StoreError::Conflict(field.to_string());
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(user) = &user {
            if !user.todos.is_empty() {
                sqlx::query("DELETE FROM todos WHERE id = ANY($1)")
                    .bind(user.todos.as_slice())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(user)
    }

    async fn push_todo_ref(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET todos = array_append(todos, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(todo_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn pull_todo_ref(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET todos = array_remove(todos, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(todo_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn create_todo(&self, data: CreateTodo) -> StoreResult<Todo> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (id, title, description, completed)
            VALUES ($1, $2, $3, FALSE)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(data.title)
        .bind(data.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn find_todo_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn find_todos_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Todo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(order_by_ids(ids, todos))
    }

    async fn update_todo(&self, id: Uuid, data: UpdateTodo) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                completed = COALESCE($4, completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "DELETE FROM todos WHERE id = $1 RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
