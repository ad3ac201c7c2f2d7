#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::HeaderMap;
use todo_api_rust::{
    app,
    auth::{issue_token, Identity, JwtSessionService, SessionError, SessionService},
    config::AppConfig,
    database::MemoryTodoStore,
    services::TodoService,
    AppState,
};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: Arc<MemoryTodoStore>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Serve the full router on a free port, backed by an in-memory store
pub async fn spawn_app() -> Result<TestServer> {
    spawn_with_sessions(Arc::new(JwtSessionService::new(SECRET, "session_token"))).await
}

pub async fn spawn_with_sessions(sessions: Arc<dyn SessionService>) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;

    let store = Arc::new(MemoryTodoStore::new());
    let state = AppState::new(sessions, TodoService::new(store.clone()));
    let router = app(state, &AppConfig::development().security);

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server crashed");
    });

    Ok(TestServer { port, base_url, store })
}

pub fn identity(id: &str) -> Identity {
    Identity {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        name: id.to_string(),
    }
}

pub fn bearer(user_id: &str) -> String {
    let token = issue_token(&identity(user_id), SECRET, chrono::Duration::hours(1))
        .expect("failed to sign test token");
    format!("Bearer {token}")
}

/// Session service whose backend is always unreachable
pub struct UnreachableSessions;

#[async_trait]
impl SessionService for UnreachableSessions {
    async fn validate(&self, _headers: &HeaderMap) -> Result<Option<Identity>, SessionError> {
        Err(SessionError::Unavailable("connection refused".to_string()))
    }
}
