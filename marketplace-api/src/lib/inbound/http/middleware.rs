use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated caller, stored in request extensions by [`authenticate`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Reasons a protected request is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthGateError {
    #[error("Authorization header is missing or invalid")]
    MissingOrInvalidHeader,

    #[error("Token rejected: {0}")]
    InvalidToken(#[from] auth::JwtError),

    #[error("Token subject is not a valid user id: {0}")]
    InvalidSubject(String),

    #[error("No user for token subject {0}")]
    UnknownSubject(UserId),

    #[error("Failed to resolve token subject: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct AuthGateErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
}

impl IntoResponse for AuthGateError {
    fn into_response(self) -> Response {
        let (status, message, error) = match &self {
            AuthGateError::MissingOrInvalidHeader => (
                StatusCode::UNAUTHORIZED,
                "Authorization header is missing or invalid!",
                None,
            ),
            AuthGateError::InvalidToken(e) => {
                (StatusCode::UNAUTHORIZED, "Token is invalid!", Some(e.kind()))
            }
            AuthGateError::InvalidSubject(_) => (
                StatusCode::UNAUTHORIZED,
                "Token is invalid!",
                Some("malformed token"),
            ),
            AuthGateError::UnknownSubject(_) => {
                (StatusCode::UNAUTHORIZED, "User not found!", None)
            }
            AuthGateError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
        };

        (status, Json(AuthGateErrorBody { message, error })).into_response()
    }
}

/// Middleware that admits only requests carrying a valid bearer token for an
/// existing user, and hands that user to the handler as [`CurrentUser`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthGateError> {
    let token = extract_token_from_header(&req).map(str::to_owned);

    let user = match token {
        Ok(token) => resolve_current_user(&state, &token).await,
        Err(e) => Err(e),
    }
    .map_err(|e| {
        match &e {
            AuthGateError::Internal(_) => tracing::error!(error = %e, "Auth gate failure"),
            _ => tracing::warn!(error = %e, uri = %req.uri(), "Rejected unauthenticated request"),
        }
        e
    })?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

async fn resolve_current_user(state: &AppState, token: &str) -> Result<User, AuthGateError> {
    let claims: auth::Claims = state.authenticator.validate_token(token)?;

    let user_id = UserId::from_string(&claims.sub)
        .map_err(|e| AuthGateError::InvalidSubject(e.to_string()))?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => AuthGateError::UnknownSubject(user_id),
            other => AuthGateError::Internal(other.to_string()),
        })
}

fn extract_token_from_header(req: &Request) -> Result<&str, AuthGateError> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthGateError::MissingOrInvalidHeader)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with_header(value: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/api/v1/users/me");
        if let Some(value) = value {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extracts_bearer_token() {
        let req = request_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token_from_header(&req), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let req = request_with_header(None);
        assert_eq!(
            extract_token_from_header(&req),
            Err(AuthGateError::MissingOrInvalidHeader)
        );
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "bearer abc", "Bearerabc", "abc.def.ghi"] {
            let req = request_with_header(Some(value));
            assert_eq!(
                extract_token_from_header(&req),
                Err(AuthGateError::MissingOrInvalidHeader),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn test_token_failures_map_to_unauthorized() {
        let response = AuthGateError::InvalidToken(auth::JwtError::TokenExpired).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthGateError::UnknownSubject(UserId(5)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_store_failure_is_not_an_auth_failure() {
        let response = AuthGateError::Internal("pool timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
