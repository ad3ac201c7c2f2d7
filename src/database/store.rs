use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::todo::{NewTodo, Todo, TodoChanges};

/// Persistent todo collection.
///
/// Every read and write is scoped by owner. `update_owned` and `delete_owned`
/// match on id and owner in a single operation, so a record owned by someone
/// else behaves exactly like a missing one.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos owned by `user_id`, most recently created first
    async fn list_for_owner(&self, user_id: &str) -> Result<Vec<Todo>, DatabaseError>;

    async fn insert(&self, todo: NewTodo) -> Result<Todo, DatabaseError>;

    /// Returns `None` when no record with `id` belongs to `user_id`
    async fn update_owned(
        &self,
        id: Uuid,
        user_id: &str,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError>;

    /// Returns `false` when no record with `id` belongs to `user_id`
    async fn delete_owned(&self, id: Uuid, user_id: &str) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
