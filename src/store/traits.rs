use crate::model::{ClientId, NewTodo, Todo, TodoId, TodoPatch};
use anyhow::Result;

/// Todo persistence. Every operation is scoped to the owning client; rows
/// owned by anyone else behave exactly like rows that do not exist.
#[async_trait::async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos of a client, newest first
    async fn list_todos(&self, client_id: &ClientId) -> Result<Vec<Todo>>;
    /// Insert a todo with `completed = false`
    async fn create_todo(&self, client_id: &ClientId, todo: NewTodo) -> Result<Todo>;
    /// Merge the present fields of `patch` into one todo
    async fn update_todo(
        &self,
        client_id: &ClientId,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Option<Todo>>;
    /// Set `completed` on every listed todo; returns the rows that changed
    async fn set_completed(
        &self,
        client_id: &ClientId,
        ids: &[TodoId],
        completed: bool,
    ) -> Result<Vec<Todo>>;
    async fn delete_todo(&self, client_id: &ClientId, id: TodoId) -> Result<Option<Todo>>;
    /// Delete every listed todo; returns the removed rows
    async fn delete_todos(&self, client_id: &ClientId, ids: &[TodoId]) -> Result<Vec<Todo>>;
}

pub trait Store: TodoStore + Send + Sync {}
