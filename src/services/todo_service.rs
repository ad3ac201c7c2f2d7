use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::{DatabaseError, NewTodo, Todo, TodoChanges, TodoStore};

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("{0}")]
    Validation(&'static str),

    /// Absent, or owned by someone else; the two are never told apart
    #[error("Todo not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

const TITLE_REQUIRED: &str = "Title is required";

/// Todo operations scoped to the requesting identity
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn TodoStore {
        self.store.as_ref()
    }

    pub async fn list(&self, owner: &Identity) -> Result<Vec<Todo>, TodoError> {
        Ok(self.store.list_for_owner(&owner.id).await?)
    }

    /// Validation happens before the store is touched
    pub async fn create(&self, owner: &Identity, title: Option<&str>) -> Result<Todo, TodoError> {
        let title = normalize_title(title)?;

        let todo = self
            .store
            .insert(NewTodo {
                title,
                user_id: owner.id.clone(),
            })
            .await?;

        tracing::info!(todo_id = %todo.id, user_id = %owner.id, "Created todo");
        Ok(todo)
    }

    pub async fn update(
        &self,
        owner: &Identity,
        id: &str,
        mut changes: TodoChanges,
    ) -> Result<Todo, TodoError> {
        let id = parse_id(id)?;
        if changes.title.is_some() {
            changes.title = Some(normalize_title(changes.title.as_deref())?);
        }

        match self.store.update_owned(id, &owner.id, &changes).await? {
            Some(todo) => Ok(todo),
            None => {
                tracing::debug!(todo_id = %id, user_id = %owner.id, "Update matched no owned todo");
                Err(TodoError::NotFound)
            }
        }
    }

    pub async fn delete(&self, owner: &Identity, id: &str) -> Result<(), TodoError> {
        let id = parse_id(id)?;

        if self.store.delete_owned(id, &owner.id).await? {
            tracing::info!(todo_id = %id, user_id = %owner.id, "Deleted todo");
            Ok(())
        } else {
            tracing::debug!(todo_id = %id, user_id = %owner.id, "Delete matched no owned todo");
            Err(TodoError::NotFound)
        }
    }
}

fn normalize_title(title: Option<&str>) -> Result<String, TodoError> {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t.to_string()),
        _ => Err(TodoError::Validation(TITLE_REQUIRED)),
    }
}

// Malformed ids cannot name any record
fn parse_id(id: &str) -> Result<Uuid, TodoError> {
    Uuid::parse_str(id).map_err(|_| TodoError::NotFound)
}
