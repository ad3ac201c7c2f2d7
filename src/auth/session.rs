use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use thiserror::Error;

use super::{decode_token, Identity};

/// Failure of the session service itself, as opposed to "no valid session"
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret not configured")]
    SecretMissing,

    #[error("Session backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a request's credentials to an [`Identity`].
///
/// `Ok(None)` means the request carries no valid session.
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn validate(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError>;
}

/// Stateless sessions carried as signed tokens in a bearer header or cookie
#[derive(Clone)]
pub struct JwtSessionService {
    secret: String,
    cookie_name: String,
}

impl JwtSessionService {
    pub fn new(secret: impl Into<String>, cookie_name: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl SessionService for JwtSessionService {
    async fn validate(&self, headers: &HeaderMap) -> Result<Option<Identity>, SessionError> {
        if self.secret.is_empty() {
            return Err(SessionError::SecretMissing);
        }

        let Some(token) = extract_token(headers, &self.cookie_name) else {
            return Ok(None);
        };

        match decode_token(&token, &self.secret) {
            Ok(claims) => Ok(Some(Identity::from(claims))),
            Err(e) => {
                tracing::debug!("Rejected session token: {}", e);
                Ok(None)
            }
        }
    }
}

/// Bearer token from the Authorization header, falling back to the session cookie
fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
