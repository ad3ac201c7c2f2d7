//! PgTodoStore against a live PostgreSQL.
//!
//! Reads DATABASE_URL from the environment or `.env`; each test returns early
//! when it is not set.

use std::time::Duration;

use anyhow::Result;
use sqlx::PgPool;
use todo_api_rust::{
    config::AppConfig,
    database::{DatabaseManager, NewTodo, PgTodoStore, TodoChanges, TodoStore},
};
use uuid::Uuid;

async fn connect() -> Result<Option<PgPool>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL store test");
        return Ok(None);
    };

    let mut database = AppConfig::development().database;
    database.url = url;
    database.max_connections = 2;

    let pool = DatabaseManager::connect(&database).await?;
    DatabaseManager::migrate(&pool).await?;
    Ok(Some(pool))
}

// Fresh owner per test so runs never see each other's rows
fn owner() -> String {
    format!("test-{}", Uuid::new_v4())
}

fn new_todo(title: &str, user_id: &str) -> NewTodo {
    NewTodo {
        title: title.to_string(),
        user_id: user_id.to_string(),
    }
}

#[tokio::test]
async fn lists_newest_first_per_owner() -> Result<()> {
    let Some(pool) = connect().await? else { return Ok(()) };
    let store = PgTodoStore::new(pool);
    let (alice, bob) = (owner(), owner());

    let first = store.insert(new_todo("first", &alice)).await?;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = store.insert(new_todo("second", &alice)).await?;
    store.insert(new_todo("other", &bob)).await?;

    assert!(!first.completed);
    assert_eq!(first.created_at, first.updated_at);

    let listed = store.list_for_owner(&alice).await?;
    assert_eq!(listed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    assert_eq!(store.list_for_owner(&bob).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn foreign_owner_cannot_update_or_delete() -> Result<()> {
    let Some(pool) = connect().await? else { return Ok(()) };
    let store = PgTodoStore::new(pool);
    let (alice, bob) = (owner(), owner());

    let todo = store.insert(new_todo("mine", &alice)).await?;
    let changes = TodoChanges {
        title: Some("stolen".to_string()),
        completed: Some(true),
    };

    assert!(store.update_owned(todo.id, &bob, &changes).await?.is_none());
    assert!(!store.delete_owned(todo.id, &bob).await?);
    assert!(store.update_owned(Uuid::new_v4(), &alice, &changes).await?.is_none());
    assert!(!store.delete_owned(Uuid::new_v4(), &alice).await?);

    assert_eq!(store.list_for_owner(&alice).await?, vec![todo.clone()]);

    assert!(store.delete_owned(todo.id, &alice).await?);
    assert!(store.list_for_owner(&alice).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_title_and_advances_updated_at() -> Result<()> {
    let Some(pool) = connect().await? else { return Ok(()) };
    let store = PgTodoStore::new(pool);
    let alice = owner();

    let todo = store.insert(new_todo("Buy milk", &alice)).await?;
    let changes = TodoChanges {
        title: None,
        completed: Some(true),
    };

    let updated = store
        .update_owned(todo.id, &alice, &changes)
        .await?
        .expect("owned todo should update");

    assert!(updated.completed);
    assert_eq!(updated.title, "Buy milk");
    assert_eq!(updated.user_id, alice);
    assert_eq!(updated.created_at, todo.created_at);
    assert!(updated.updated_at >= todo.updated_at);
    Ok(())
}
