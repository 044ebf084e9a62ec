/// Todo endpoints
///
/// Every handler runs behind the cookie gate. A todo is reachable only
/// through the caller's reference set; operations on a specific todo go
/// through [`require_todo_owner`] before touching the store.
///
/// # Endpoints
///
/// - `POST /api/todos` - Create a todo
/// - `GET /api/todos` - List the caller's todos
/// - `PATCH /api/todos/:todo_id` - Update an owned todo
/// - `DELETE /api/todos/:todo_id` - Delete an owned todo

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tickoff_shared::{
    auth::{
        middleware::AuthContext,
        ownership::{require_todo_owner, require_user},
    },
    models::todo::{CreateTodo, Todo, UpdateTodo},
};
use tracing::{info, warn};
use validator::Validate;

/// Create todo request
///
/// Titles are capped at 255 characters to fit the `todos.title` column.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Update todo request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for UpdateTodo {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            completed: req.completed,
        }
    }
}

/// Whitespace-only titles pass the length check but are still blank
fn reject_blank_title(title: &str) -> ApiResult<()> {
    if title.trim().is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail::new(
            "title",
            "Title is required",
        )]));
    }
    Ok(())
}

/// Response carrying one todo
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub message: String,
    pub todo: Todo,
}

/// List response
#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

/// Creates a todo and appends it to the caller's reference set
///
/// # Errors
///
/// - `400 Bad Request`: Missing, blank, or over-long title
/// - `404 Not Found`: The caller's account no longer exists
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let Json(req) = payload?;
    reject_blank_title(&req.title)?;
    req.validate()?;

    let user = require_user(state.store.as_ref(), auth.user_id).await?;

    let todo = state
        .store
        .create_todo(CreateTodo {
            title: req.title,
            description: req.description,
        })
        .await?;

    // The account can disappear between the lookup and the push
    if state.store.push_todo_ref(user.id, todo.id).await?.is_none() {
        warn!(user_id = %user.id, todo_id = %todo.id, "User vanished while creating todo");
        state.store.delete_todo(todo.id).await?;
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = %user.id, todo_id = %todo.id, "Todo created");

    Ok(Json(TodoResponse {
        message: "Todo created successfully".to_string(),
        todo,
    }))
}

/// Lists the caller's todos in creation order
///
/// Ids whose record is gone are skipped.
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TodoListResponse>> {
    let user = require_user(state.store.as_ref(), auth.user_id).await?;

    let todos = state.store.find_todos_by_ids(&user.todos).await?;

    Ok(Json(TodoListResponse { todos }))
}

/// Partially updates an owned todo
///
/// Ownership is checked before the body is looked at, so a non-owner gets
/// 403 whatever they send.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, or blank or over-long title
/// - `403 Forbidden`: The id is not in the caller's reference set
/// - `404 Not Found`: Account gone, or the referenced todo is gone
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(todo_id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let owned = require_todo_owner(state.store.as_ref(), auth.user_id, &todo_id).await?;

    let Json(req) = payload?;
    if let Some(title) = &req.title {
        reject_blank_title(title)?;
    }
    req.validate()?;

    let todo = state
        .store
        .update_todo(owned.todo.id, req.into())
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    info!(user_id = %owned.user.id, todo_id = %todo.id, "Todo updated");

    Ok(Json(TodoResponse {
        message: "Todo updated successfully".to_string(),
        todo,
    }))
}

/// Deletes an owned todo and removes it from the caller's reference set
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(todo_id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let owned = require_todo_owner(state.store.as_ref(), auth.user_id, &todo_id).await?;
    let id = owned.todo.id;

    let todo = state.store.delete_todo(id).await?.unwrap_or(owned.todo);
    state.store.pull_todo_ref(owned.user.id, id).await?;

    info!(user_id = %owned.user.id, todo_id = %id, "Todo deleted");

    Ok(Json(TodoResponse {
        message: "Todo deleted successfully".to_string(),
        todo,
    }))
}
