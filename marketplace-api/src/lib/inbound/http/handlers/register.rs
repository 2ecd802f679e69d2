use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use super::INVALID_BODY;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable registration body");
        ApiError::BadRequest(INVALID_BODY.to_string())
    })?;

    let command = body.try_into_command().map_err(|e| {
        tracing::debug!(error = %e, "Rejected registration");
        ApiError::from(e)
    })?;

    state
        .user_service
        .register_user(command)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        MessageData {
            message: "User registered successfully".to_string(),
        },
    ))
}

/// HTTP request body for registration (raw JSON). Absent and `null` fields
/// are both treated as missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    email: Option<String>,
    password: Option<String>,
    username: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        match (self.email, self.password, self.username) {
            (Some(email), Some(password), Some(username)) => Ok(RegisterUserCommand::new(
                Username::new(username),
                EmailAddress::new(email),
                password,
            )),
            (email, password, username) => {
                let missing = [
                    ("email", email.is_none()),
                    ("password", password.is_none()),
                    ("username", username.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(UserError::MissingFields(missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> RegisterRequest {
        serde_json::from_value(json).expect("Failed to parse request")
    }

    #[test]
    fn test_complete_request_becomes_command() {
        let command = request(serde_json::json!({
            "email": "ana@example.com",
            "password": "s3cret",
            "username": "ana"
        }))
        .try_into_command()
        .unwrap();

        assert_eq!(command.username.as_str(), "ana");
        assert_eq!(command.email.as_str(), "ana@example.com");
        assert_eq!(command.password, "s3cret");
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let err = request(serde_json::json!({ "username": "ana", "password": null }))
            .try_into_command()
            .unwrap_err();

        match err {
            UserError::MissingFields(fields) => assert_eq!(fields, vec!["email", "password"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
