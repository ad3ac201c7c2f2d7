pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::SessionService;
use crate::config::SecurityConfig;
use crate::services::TodoService;

/// Dependencies shared by every request, constructed once at startup
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionService>,
    pub todos: TodoService,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionService>, todos: TodoService) -> Self {
        Self { sessions, todos }
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Protected; /api prefix is the browser client's base path
        .merge(todo_routes(state.clone()))
        .nest("/api", todo_routes(state.clone()))
        // Global middleware
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn todo_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route("/todos", get(protected::todo_list).post(protected::todo_create))
        .route(
            "/todos/:id",
            put(protected::todo_update).delete(protected::todo_delete),
        )
        .route_layer(from_fn_with_state(state, middleware::session_gate))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .expose_headers([header::SET_COOKIE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtSessionService;
    use crate::config::AppConfig;
    use crate::database::MemoryTodoStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(
            Arc::new(JwtSessionService::new("secret", "session_token")),
            TodoService::new(Arc::new(MemoryTodoStore::new())),
        );
        app(state, &AppConfig::development().security)
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/todos")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn preflight_allows_configured_origin_with_credentials() {
        let response = test_app().oneshot(preflight("http://localhost:5173")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn preflight_from_unknown_origin_gets_no_grant() {
        let response = test_app().oneshot(preflight("http://evil.example")).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn todo_routes_sit_behind_the_gate() {
        for uri in ["/todos", "/api/todos"] {
            let response = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, json!({ "error": "Unauthorized" }));
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
