use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::Slice;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::points::{self, rewards};
use crate::state::AppState;
use crate::store::FEATURE_TODOS;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list).post(add))
        .route("/todos/:id", delete(remove))
        .route("/todos/:id/toggle", post(toggle))
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<String>,
    pub completed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

fn default_priority() -> String {
    "medium".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoRequest {
    pub text: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub todo: Todo,
    pub points: i64,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos: Vec<Todo> = Slice::new(&state.kv, FEATURE_TODOS, user_id).list().await?;
    let filtered = match query.filter.as_deref() {
        None | Some("all") => todos,
        Some("active") => todos.into_iter().filter(|t| !t.completed).collect(),
        Some("completed") => todos.into_iter().filter(|t| t.completed).collect(),
        Some(_) => return Err(ApiError::bad_request("Unknown todo filter")),
    };
    Ok(Json(filtered))
}

#[instrument(skip(state, payload))]
async fn add(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter a task"));
    }
    if !matches!(payload.priority.as_str(), "low" | "medium" | "high") {
        return Err(ApiError::bad_request("Priority must be low, medium or high"));
    }

    let slice = Slice::new(&state.kv, FEATURE_TODOS, user_id);
    let todo = slice
        .update(|todos: &mut Vec<Todo>| {
            let todo = Todo {
                id: Uuid::new_v4(),
                text: payload.text.trim().to_string(),
                priority: payload.priority.clone(),
                due_date: payload.due_date.clone(),
                completed: false,
                created_at: OffsetDateTime::now_utc(),
            };
            todos.push(todo.clone());
            Ok(todo)
        })
        .await?;

    let points = points::award(&state, user_id, rewards::TODO_ADD).await?;
    Ok(Json(TodoResponse { todo, points }))
}

#[instrument(skip(state))]
async fn toggle(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TodoResponse>, ApiError> {
    let slice = Slice::new(&state.kv, FEATURE_TODOS, user_id);
    let todo = slice
        .update(|todos: &mut Vec<Todo>| {
            let todo = todos
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| ApiError::not_found("Task not found"))?;
            todo.completed = !todo.completed;
            Ok(todo.clone())
        })
        .await?;

    // Completing a task earns points, unchecking it does not.
    let points = if todo.completed {
        points::award(&state, user_id, rewards::TODO_DONE).await?
    } else {
        crate::auth::repo::User::find_by_id(&state.kv, user_id)
            .await?
            .map(|u| u.points)
            .unwrap_or(0)
    };
    Ok(Json(TodoResponse { todo, points }))
}

#[instrument(skip(state))]
async fn remove(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let slice = Slice::new(&state.kv, FEATURE_TODOS, user_id);
    slice
        .update(|todos: &mut Vec<Todo>| {
            let before = todos.len();
            todos.retain(|t| t.id != id);
            if todos.len() == before {
                return Err(ApiError::not_found("Task not found"));
            }
            Ok(())
        })
        .await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(state: &AppState, user: Uuid, text: &str, completed: bool) {
        Slice::new(&state.kv, FEATURE_TODOS, user)
            .update(|todos: &mut Vec<Todo>| {
                todos.push(Todo {
                    id: Uuid::new_v4(),
                    text: text.to_string(),
                    priority: "medium".to_string(),
                    due_date: None,
                    completed,
                    created_at: OffsetDateTime::now_utc(),
                });
                Ok(())
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn filters_partition_the_list() {
        let state = AppState::in_memory();
        let user = Uuid::new_v4();
        seed(&state, user, "open task", false).await;
        seed(&state, user, "done task", true).await;

        let all: Vec<Todo> = Slice::new(&state.kv, FEATURE_TODOS, user).list().await.unwrap();
        assert_eq!(all.len(), 2);
        let active: Vec<_> = all.iter().filter(|t| !t.completed).collect();
        let completed: Vec<_> = all.iter().filter(|t| t.completed).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(completed.len(), 1);
        assert_eq!(active[0].text, "open task");
    }

    #[tokio::test]
    async fn toggling_flips_completed() {
        let state = AppState::in_memory();
        let user = Uuid::new_v4();
        seed(&state, user, "task", false).await;
        let todos: Vec<Todo> = Slice::new(&state.kv, FEATURE_TODOS, user).list().await.unwrap();
        let id = todos[0].id;

        let toggled = Slice::new(&state.kv, FEATURE_TODOS, user)
            .update(|todos: &mut Vec<Todo>| {
                let t = todos.iter_mut().find(|t| t.id == id).unwrap();
                t.completed = !t.completed;
                Ok(t.clone())
            })
            .await
            .unwrap();
        assert!(toggled.completed);
    }
}
