use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{TodoIdPath, ValidatedJson};
use crate::config::ClientIdMode;
use crate::model::{
    BulkComplete, BulkIds, ClientId, NewTodo, Todo, TodoPatch, TodoUpdate, TodosResponse,
};
use crate::store::traits::Store;

const TODO_NOT_FOUND: &str = "Todo not found";
const NO_MATCHING_TODOS: &str = "No matching todos found";

pub struct AppState<S> {
    pub store: Arc<S>,
    pub client_id_mode: ClientIdMode,
}

impl<S> AppState<S> {
    pub fn new(store: Arc<S>, client_id_mode: ClientIdMode) -> Self {
        Self {
            store,
            client_id_mode,
        }
    }
}

// Manual impl: `S` itself need not be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            client_id_mode: self.client_id_mode,
        }
    }
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `GET /todos`
pub async fn list_todos<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list_todos(&client_id).await?;
    log::debug!("Listed {} todos for client {}", todos.len(), client_id);
    Ok(Json(todos))
}

/// `POST /todos`
pub async fn create_todo<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    ValidatedJson(new_todo): ValidatedJson<NewTodo>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.create_todo(&client_id, new_todo).await?;
    log::info!("Created todo {} for client {}", todo.id, client_id);
    Ok(Json(todo))
}

/// `PATCH /todos`: entries are applied one at a time in input order; entries
/// that match no owned todo are skipped. Earlier entries stay applied if a
/// later one fails.
pub async fn update_todos<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    ValidatedJson(updates): ValidatedJson<Vec<TodoUpdate>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let requested = updates.len();
    let mut updated = Vec::with_capacity(requested);

    for TodoUpdate { id, patch } in updates {
        if let Some(todo) = state.store.update_todo(&client_id, id, patch).await? {
            updated.push(todo);
        }
    }

    log::info!(
        "Batch update for client {}: {} of {} entries applied",
        client_id,
        updated.len(),
        requested
    );
    Ok(Json(updated))
}

/// `PATCH /todos/:id`
pub async fn update_todo<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    TodoIdPath(id): TodoIdPath,
    ValidatedJson(patch): ValidatedJson<TodoPatch>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .store
        .update_todo(&client_id, id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound(TODO_NOT_FOUND.to_string()))?;

    log::info!("Updated todo {} for client {}", id, client_id);
    Ok(Json(todo))
}

/// `POST /todos/bulk-complete`
pub async fn bulk_complete<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    ValidatedJson(request): ValidatedJson<BulkComplete>,
) -> Result<Json<TodosResponse>, ApiError> {
    let todos = state
        .store
        .set_completed(&client_id, &request.ids, request.completed)
        .await?;

    if todos.is_empty() {
        return Err(ApiError::NotFound(NO_MATCHING_TODOS.to_string()));
    }

    log::info!(
        "Set completed={} on {} todos for client {}",
        request.completed,
        todos.len(),
        client_id
    );
    Ok(Json(TodosResponse { todos }))
}

/// `DELETE /todos`
pub async fn delete_todos<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    ValidatedJson(request): ValidatedJson<BulkIds>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let deleted = state.store.delete_todos(&client_id, &request.ids).await?;
    log::info!("Deleted {} todos for client {}", deleted.len(), client_id);
    Ok(Json(deleted))
}

/// `DELETE /todos/:id`
pub async fn delete_todo<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    TodoIdPath(id): TodoIdPath,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .store
        .delete_todo(&client_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(TODO_NOT_FOUND.to_string()))?;

    log::info!("Deleted todo {} for client {}", id, client_id);
    Ok(Json(todo))
}

/// `POST /todos/bulk-delete`
pub async fn bulk_delete<S: Store>(
    State(state): State<AppState<S>>,
    client_id: ClientId,
    ValidatedJson(request): ValidatedJson<BulkIds>,
) -> Result<Json<TodosResponse>, ApiError> {
    let todos = state.store.delete_todos(&client_id, &request.ids).await?;

    if todos.is_empty() {
        return Err(ApiError::NotFound(NO_MATCHING_TODOS.to_string()));
    }

    log::info!("Bulk deleted {} todos for client {}", todos.len(), client_id);
    Ok(Json(TodosResponse { todos }))
}
