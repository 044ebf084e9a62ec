//! In-memory store
//!
//! Both collections live behind one `RwLock`, so every trait method is a
//! single atomic step just like its SQL counterpart. Nothing is persisted.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{order_by_ids, Store, StoreError, StoreResult, TodoStore, UserStore};
use crate::models::{
    todo::{CreateTodo, Todo, UpdateTodo},
    user::{CreateUser, UpdateUser, User},
};

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    todos: HashMap<Uuid, Todo>,
}

impl Collections {
    /// Mirrors the UNIQUE constraints of the SQL schema
    fn check_unique(
        &self,
        exclude: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<()> {
        for user in self.users.values() {
            if Some(user.id) == exclude {
                continue;
            }
            if username == Some(user.username.as_str()) {
                return Err(StoreError::Conflict("username".to_string()));
            }
            if email == Some(user.email.as_str()) {
                return Err(StoreError::Conflict("email".to_string()));
            }
        }
        Ok(())
    }
}

/// Store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of todo records, referenced or not
    pub async fn todo_count(&self) -> usize {
        self.inner.read().await.todos.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        inner.check_unique(None, Some(&data.username), Some(&data.email))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            todos: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        if !inner.users.contains_key(&id) {
            return Ok(None);
        }
        inner.check_unique(Some(id), data.username.as_deref(), data.email.as_deref())?;

        Ok(inner.users.get_mut(&id).map(|user| {
            user.apply(data);
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.remove(&id) else {
            return Ok(None);
        };
        for todo_id in &user.todos {
            inner.todos.remove(todo_id);
        }
        Ok(Some(user))
    }

    async fn push_todo_ref(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|user| {
            user.todos.push(todo_id);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn pull_todo_ref(&self, user_id: Uuid, todo_id: Uuid) -> StoreResult<Option<User>> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&user_id).map(|user| {
            user.todos.retain(|id| *id != todo_id);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create_todo(&self, data: CreateTodo) -> StoreResult<Todo> {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.todos.insert(todo.id, todo.clone());

        Ok(todo)
    }

    async fn find_todo_by_id(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(self.inner.read().await.todos.get(&id).cloned())
    }

    async fn find_todos_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Todo>> {
        let inner = self.inner.read().await;
        let found = ids
            .iter()
            .filter_map(|id| inner.todos.get(id).cloned())
            .collect();
        Ok(order_by_ids(ids, found))
    }

    async fn update_todo(&self, id: Uuid, data: UpdateTodo) -> StoreResult<Option<Todo>> {
        let mut inner = self.inner.write().await;
        Ok(inner.todos.get_mut(&id).map(|todo| {
            todo.apply(data);
            todo.clone()
        }))
    }

    async fn delete_todo(&self, id: Uuid) -> StoreResult<Option<Todo>> {
        Ok(self.inner.write().await.todos.remove(&id))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
