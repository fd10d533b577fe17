use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::validation::{Validate, ValidationError};

pub type TodoId = i64;

/// A todo item as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(deserialize_with = "deserialize_completed")]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub client_id: String,
}

/// `completed` as some storage layers hand it back: a real boolean or an integer flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StoredCompleted {
    Bool(bool),
    Int(i64),
}

impl From<StoredCompleted> for bool {
    fn from(value: StoredCompleted) -> Self {
        match value {
            StoredCompleted::Bool(b) => b,
            StoredCompleted::Int(n) => n == 1,
        }
    }
}

fn deserialize_completed<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    StoredCompleted::deserialize(deserializer).map(bool::from)
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTodo {
    pub title: String,
}

impl Validate for NewTodo {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("title", &self.title)
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl Validate for TodoPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) => non_empty("title", title),
            None => Ok(()),
        }
    }
}

/// One entry of a `PATCH /todos` batch
#[derive(Debug, Clone, Deserialize)]
pub struct TodoUpdate {
    pub id: TodoId,
    #[serde(flatten)]
    pub patch: TodoPatch,
}

impl Validate for TodoUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        self.patch.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkComplete {
    pub ids: Vec<TodoId>,
    pub completed: bool,
}

impl Validate for BulkComplete {}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkIds {
    pub ids: Vec<TodoId>,
}

impl Validate for BulkIds {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodosResponse {
    pub todos: Vec<Todo>,
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
