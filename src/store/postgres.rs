use anyhow::{Context, Result};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Row,
};

use crate::model::{ClientId, NewTodo, StoredCompleted, Todo, TodoId, TodoPatch};
use crate::store::traits::{Store, TodoStore};

const TODO_COLUMNS: &str = "id, title, completed, created_at, client_id";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Shape a `todos` row into a `Todo`, accepting boolean or integer `completed` columns
fn todo_from_row(row: &PgRow) -> Result<Todo> {
    Ok(Todo {
        id: row.try_get("id").context("Failed to read todo id")?,
        title: row.try_get("title").context("Failed to read todo title")?,
        completed: read_completed(row)?,
        created_at: row
            .try_get("created_at")
            .context("Failed to read todo created_at")?,
        client_id: row
            .try_get("client_id")
            .context("Failed to read todo client_id")?,
    })
}

fn read_completed(row: &PgRow) -> Result<bool> {
    if let Ok(flag) = row.try_get::<bool, _>("completed") {
        return Ok(flag);
    }

    let flag = match row.try_get::<i64, _>("completed") {
        Ok(flag) => flag,
        Err(_) => row
            .try_get::<i32, _>("completed")
            .map(i64::from)
            .or_else(|_| row.try_get::<i16, _>("completed").map(i64::from))
            .context("Failed to read todo completed flag")?,
    };

    Ok(StoredCompleted::Int(flag).into())
}

fn todos_from_rows(rows: &[PgRow]) -> Result<Vec<Todo>> {
    let mut todos = rows.iter().map(todo_from_row).collect::<Result<Vec<_>>>()?;
    todos.sort_by_key(|todo| todo.id);
    Ok(todos)
}

#[async_trait::async_trait]
impl TodoStore for PostgresStore {
    async fn list_todos(&self, client_id: &ClientId) -> Result<Vec<Todo>> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE client_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(client_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to list todos")?;

        rows.iter().map(todo_from_row).collect()
    }

    async fn create_todo(&self, client_id: &ClientId, todo: NewTodo) -> Result<Todo> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO todos (title, completed, created_at, client_id)
            VALUES ($1, FALSE, NOW(), $2)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(todo.title)
        .bind(client_id.as_str())
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert todo")?;

        todo_from_row(&row)
    }

    async fn update_todo(
        &self,
        client_id: &ClientId,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Option<Todo>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE todos
            SET title = COALESCE($1, title),
                completed = COALESCE($2, completed)
            WHERE id = $3 AND client_id = $4
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(patch.title)
        .bind(patch.completed)
        .bind(id)
        .bind(client_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update todo")?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn set_completed(
        &self,
        client_id: &ClientId,
        ids: &[TodoId],
        completed: bool,
    ) -> Result<Vec<Todo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            r#"
            UPDATE todos
            SET completed = $1
            WHERE id = ANY($2) AND client_id = $3
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(completed)
        .bind(ids)
        .bind(client_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to bulk update todos")?;

        todos_from_rows(&rows)
    }

    async fn delete_todo(&self, client_id: &ClientId, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(&format!(
            "DELETE FROM todos WHERE id = $1 AND client_id = $2 RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .bind(client_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to delete todo")?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn delete_todos(&self, client_id: &ClientId, ids: &[TodoId]) -> Result<Vec<Todo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "DELETE FROM todos WHERE id = ANY($1) AND client_id = $2 RETURNING {TODO_COLUMNS}"
        ))
        .bind(ids)
        .bind(client_id.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to bulk delete todos")?;

        todos_from_rows(&rows)
    }
}

impl Store for PostgresStore {}
