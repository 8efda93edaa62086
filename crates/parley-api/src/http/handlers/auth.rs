//! Account HTTP handlers.
//!
//! Endpoints:
//! - POST /api/auth/register - Create an account and sign in
//! - POST /api/auth/login    - Sign in with username and password

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use validator::Validate;

use parley_core::identity::service::AuthGrant;

use crate::http::error::AppError;
use crate::http::extractors::json::ValidatedJson;
use crate::state::AppState;

/// Request body shared by register and login.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(
        min = 3,
        max = 30,
        message = "\"username\" length must be between 3 and 30 characters"
    ))]
    pub username: String,
    #[validate(length(min = 6, message = "\"password\" length must be at least 6 characters long"))]
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthGrant>), AppError> {
    let grant = state
        .identity_service
        .register(&body.username, &body.password)
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CredentialsRequest>,
) -> Result<Json<AuthGrant>, AppError> {
    let grant = state
        .identity_service
        .login(&body.username, &body.password)
        .await?;
    Ok(Json(grant))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn username_length_bounds() {
        assert!(credentials("abc", "secret").validate().is_ok());
        assert!(credentials(&"a".repeat(30), "secret").validate().is_ok());
        assert!(credentials("ab", "secret").validate().is_err());
        assert!(credentials(&"a".repeat(31), "secret").validate().is_err());
    }

    #[test]
    fn password_length_bound() {
        assert!(credentials("alice", "123456").validate().is_ok());
        let errors = credentials("alice", "12345").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
