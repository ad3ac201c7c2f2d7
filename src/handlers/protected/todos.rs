use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Identity;
use crate::database::{Todo, TodoChanges};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::TodoError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    /// Kept loose so a non-string title reads as missing rather than malformed JSON
    #[serde(default)]
    pub title: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl From<UpdateTodoRequest> for TodoChanges {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            // A non-string title becomes blank and fails title validation
            title: req
                .title
                .map(|v| v.as_str().map(str::to_string).unwrap_or_default()),
            completed: req.completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteTodoResponse {
    pub message: &'static str,
}

/// GET /todos - All todos of the caller, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<Todo>> {
    let todos = state
        .todos
        .list(&identity)
        .await
        .map_err(|e| into_api_error(e, "Failed to fetch todos"))?;

    Ok(ApiResponse::success(todos))
}

/// POST /todos - Create a todo owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "Buy milk" }
/// ```
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(payload) = payload?;
    let title = payload.title.as_ref().and_then(Value::as_str);

    let todo = state
        .todos
        .create(&identity, title)
        .await
        .map_err(|e| into_api_error(e, "Failed to create todo"))?;

    Ok(ApiResponse::created(todo))
}

/// PUT /todos/:id - Change title and/or completion of one of the caller's todos
///
/// Keys other than `title` and `completed` are ignored.
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(payload) = payload?;

    let todo = state
        .todos
        .update(&identity, &id, payload.into())
        .await
        .map_err(|e| into_api_error(e, "Failed to update todo"))?;

    Ok(ApiResponse::success(todo))
}

/// DELETE /todos/:id - Permanently remove one of the caller's todos
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<DeleteTodoResponse> {
    state
        .todos
        .delete(&identity, &id)
        .await
        .map_err(|e| into_api_error(e, "Failed to delete todo"))?;

    Ok(ApiResponse::success(DeleteTodoResponse {
        message: "Todo deleted successfully",
    }))
}

/// Store failures are logged with their cause and answered with `failure` only
fn into_api_error(err: TodoError, failure: &'static str) -> ApiError {
    match err {
        TodoError::Validation(msg) => ApiError::bad_request(msg),
        TodoError::NotFound => ApiError::not_found("Todo not found"),
        TodoError::Store(e) => {
            tracing::error!("{}: {}", failure, e);
            ApiError::internal_server_error(failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn changes(body: Value) -> TodoChanges {
        serde_json::from_value::<UpdateTodoRequest>(body).unwrap().into()
    }

    #[test]
    fn update_request_keeps_only_allowed_fields() {
        let c = changes(json!({ "title": "x", "completed": true, "userId": "bob" }));
        assert_eq!(c.title.as_deref(), Some("x"));
        assert_eq!(c.completed, Some(true));

        assert_eq!(changes(json!({})), TodoChanges::default());
    }

    #[test]
    fn non_string_title_reads_as_blank() {
        assert_eq!(changes(json!({ "title": 42 })).title.as_deref(), Some(""));
        assert_eq!(changes(json!({ "title": null })).title, None);
    }
}
