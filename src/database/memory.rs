use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::todo::{NewTodo, Todo, TodoChanges};
use super::store::TodoStore;

struct Row {
    // Breaks createdAt ties so later inserts always list first
    seq: u64,
    todo: Todo,
}

#[derive(Default)]
struct Rows {
    next_seq: u64,
    by_id: HashMap<Uuid, Row>,
}

/// In-process todo store used by tests and local runs without PostgreSQL
#[derive(Default)]
pub struct MemoryTodoStore {
    rows: RwLock<Rows>,
    unavailable: AtomicBool,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail, simulating a lost database
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DatabaseError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_for_owner(&self, user_id: &str) -> Result<Vec<Todo>, DatabaseError> {
        self.check_available()?;
        let rows = self.rows.read().await;

        let mut owned: Vec<&Row> = rows
            .by_id
            .values()
            .filter(|row| row.todo.user_id == user_id)
            .collect();
        owned.sort_by(|a, b| {
            b.todo
                .created_at
                .cmp(&a.todo.created_at)
                .then(b.seq.cmp(&a.seq))
        });

        Ok(owned.into_iter().map(|row| row.todo.clone()).collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;

        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            title: todo.title,
            completed: false,
            user_id: todo.user_id,
            created_at: now,
            updated_at: now,
        };

        let seq = rows.next_seq;
        rows.next_seq += 1;
        rows.by_id.insert(todo.id, Row { seq, todo: todo.clone() });
        Ok(todo)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: &str,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;

        let Some(row) = rows.by_id.get_mut(&id).filter(|row| row.todo.user_id == user_id) else {
            return Ok(None);
        };

        changes.apply_to(&mut row.todo);
        row.todo.updated_at = Utc::now().max(row.todo.updated_at);
        Ok(Some(row.todo.clone()))
    }

    async fn delete_owned(&self, id: Uuid, user_id: &str) -> Result<bool, DatabaseError> {
        self.check_available()?;
        let mut rows = self.rows.write().await;

        let owned = rows
            .by_id
            .get(&id)
            .is_some_and(|row| row.todo.user_id == user_id);
        if owned {
            rows.by_id.remove(&id);
        }
        Ok(owned)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.check_available()
    }
}
