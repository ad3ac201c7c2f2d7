use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::todo::{NewTodo, Todo, TodoChanges};
use super::store::TodoStore;

const TODO_COLUMNS: &str = "id, title, completed, user_id, created_at, updated_at";

/// PostgreSQL-backed todo store sharing the process-wide pool
#[derive(Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list_for_owner(&self, user_id: &str) -> Result<Vec<Todo>, DatabaseError> {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let rows = sqlx::query_as::<_, Todo>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, DatabaseError> {
        let sql = format!(
            "INSERT INTO todos (id, title, completed, user_id, created_at, updated_at) \
             VALUES ($1, $2, FALSE, $3, now(), now()) \
             RETURNING {TODO_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(Uuid::new_v4())
            .bind(&todo.title)
            .bind(&todo.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: &str,
        changes: &TodoChanges,
    ) -> Result<Option<Todo>, DatabaseError> {
        // Ownership check and write happen in one statement
        let sql = format!(
            "UPDATE todos \
             SET title = COALESCE($3, title), \
                 completed = COALESCE($4, completed), \
                 updated_at = GREATEST(now(), updated_at) \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {TODO_COLUMNS}"
        );

        let row = sqlx::query_as::<_, Todo>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(changes.title.as_deref())
            .bind(changes.completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_owned(&self, id: Uuid, user_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
