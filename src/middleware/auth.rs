use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::AppState;

/// Session gate: every route beneath this layer requires a valid session.
///
/// On success the resolved [`Identity`](crate::auth::Identity) is inserted into
/// request extensions for handlers to take as `Extension<Identity>`. Otherwise
/// the request ends here with 401.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match state.sessions.validate(request.headers()).await {
        Ok(Some(identity)) => identity,
        Ok(None) => return Err(ApiError::unauthorized("Unauthorized")),
        Err(e) => {
            tracing::error!("Session validation failed: {}", e);
            return Err(ApiError::unauthorized("Authentication failed"));
        }
    };

    tracing::debug!(user_id = %identity.id, "Session validated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
