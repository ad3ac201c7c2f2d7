use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single task owned by exactly one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub completed: bool,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; id, completion and timestamps are assigned by the store
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub user_id: String,
}

/// The only fields a client may change on an existing todo
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    /// Merge onto an existing record; unspecified fields are left as they are
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}
