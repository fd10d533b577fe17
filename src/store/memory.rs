use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;

use crate::model::{ClientId, NewTodo, Todo, TodoId, TodoPatch};
use crate::store::traits::{Store, TodoStore};

/// In-process store with the same scoping rules as the PostgreSQL one.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryTables>,
}

#[derive(Debug, Default)]
struct MemoryTables {
    next_id: TodoId,
    todos: Vec<Todo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(todo: &Todo, client_id: &ClientId) -> bool {
    todo.client_id == client_id.as_str()
}

#[async_trait::async_trait]
impl TodoStore for MemoryStore {
    async fn list_todos(&self, client_id: &ClientId) -> Result<Vec<Todo>> {
        let tables = self.inner.read();
        let mut todos: Vec<Todo> = tables
            .todos
            .iter()
            .filter(|todo| owned_by(todo, client_id))
            .cloned()
            .collect();
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(todos)
    }

    async fn create_todo(&self, client_id: &ClientId, todo: NewTodo) -> Result<Todo> {
        let mut tables = self.inner.write();
        tables.next_id += 1;

        let todo = Todo {
            id: tables.next_id,
            title: todo.title,
            completed: false,
            created_at: Utc::now(),
            client_id: client_id.to_string(),
        };
        tables.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_todo(
        &self,
        client_id: &ClientId,
        id: TodoId,
        patch: TodoPatch,
    ) -> Result<Option<Todo>> {
        let mut tables = self.inner.write();
        let Some(todo) = tables
            .todos
            .iter_mut()
            .find(|todo| todo.id == id && owned_by(todo, client_id))
        else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        Ok(Some(todo.clone()))
    }

    async fn set_completed(
        &self,
        client_id: &ClientId,
        ids: &[TodoId],
        completed: bool,
    ) -> Result<Vec<Todo>> {
        let mut tables = self.inner.write();
        let mut updated: Vec<Todo> = tables
            .todos
            .iter_mut()
            .filter(|todo| ids.contains(&todo.id) && owned_by(todo, client_id))
            .map(|todo| {
                todo.completed = completed;
                todo.clone()
            })
            .collect();
        updated.sort_by_key(|todo| todo.id);
        Ok(updated)
    }

    async fn delete_todo(&self, client_id: &ClientId, id: TodoId) -> Result<Option<Todo>> {
        let mut tables = self.inner.write();
        let position = tables
            .todos
            .iter()
            .position(|todo| todo.id == id && owned_by(todo, client_id));
        Ok(position.map(|index| tables.todos.remove(index)))
    }

    async fn delete_todos(&self, client_id: &ClientId, ids: &[TodoId]) -> Result<Vec<Todo>> {
        let mut tables = self.inner.write();
        let (mut deleted, kept): (Vec<Todo>, Vec<Todo>) = std::mem::take(&mut tables.todos)
            .into_iter()
            .partition(|todo| ids.contains(&todo.id) && owned_by(todo, client_id));
        tables.todos = kept;
        deleted.sort_by_key(|todo| todo.id);
        Ok(deleted)
    }
}

impl Store for MemoryStore {}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str) -> ClientId {
        ClientId::parse(id).unwrap()
    }

    async fn create(store: &MemoryStore, owner: &ClientId, title: &str) -> Todo {
        store
            .create_todo(
                owner,
                NewTodo {
                    title: title.to_string(),
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_ids() {
        let store = MemoryStore::new();
        let alice = client("alice");

        let first = create(&store, &alice, "one").await;
        let second = create(&store, &alice, "two").await;

        assert_ne!(first.id, second.id);
        assert!(!first.completed);
        assert_eq!(first.client_id, "alice");
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_scoped() {
        let store = MemoryStore::new();
        let alice = client("alice");
        let bob = client("bob");

        create(&store, &alice, "t1").await;
        create(&store, &bob, "other").await;
        create(&store, &alice, "t2").await;
        create(&store, &alice, "t3").await;

        let titles: Vec<String> = store
            .list_todos(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(titles, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let store = MemoryStore::new();
        let alice = client("alice");
        let todo = create(&store, &alice, "X").await;

        let updated = store
            .update_todo(
                &alice,
                todo.id,
                TodoPatch {
                    title: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "X");
        assert!(updated.completed);
        assert_eq!(updated.created_at, todo.created_at);
    }

    #[tokio::test]
    async fn test_foreign_rows_are_invisible() {
        let store = MemoryStore::new();
        let alice = client("alice");
        let bob = client("bob");
        let todo = create(&store, &alice, "mine").await;

        let patch = TodoPatch {
            title: Some("stolen".to_string()),
            completed: None,
        };
        assert!(store.update_todo(&bob, todo.id, patch).await.unwrap().is_none());
        assert!(store.delete_todo(&bob, todo.id).await.unwrap().is_none());
        assert!(store.delete_todos(&bob, &[todo.id]).await.unwrap().is_empty());
        assert!(store.set_completed(&bob, &[todo.id], true).await.unwrap().is_empty());

        let remaining = store.list_todos(&alice).await.unwrap();
        assert_eq!(remaining, vec![todo]);
    }

    #[tokio::test]
    async fn test_set_completed_only_touches_owned_ids() {
        let store = MemoryStore::new();
        let alice = client("alice");
        let bob = client("bob");
        let a1 = create(&store, &alice, "a1").await;
        let b1 = create(&store, &bob, "b1").await;
        let a2 = create(&store, &alice, "a2").await;

        let updated = store
            .set_completed(&bob, &[a1.id, b1.id, a2.id], true)
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, b1.id);
        assert!(store.list_todos(&alice).await.unwrap().iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn test_delete_todos_returns_removed_rows() {
        let store = MemoryStore::new();
        let alice = client("alice");
        let a1 = create(&store, &alice, "a1").await;
        let a2 = create(&store, &alice, "a2").await;
        let a3 = create(&store, &alice, "a3").await;

        let deleted = store.delete_todos(&alice, &[a3.id, a1.id, 999]).await.unwrap();

        assert_eq!(deleted, vec![a1, a3]);
        assert_eq!(store.list_todos(&alice).await.unwrap(), vec![a2]);
    }
}
