//! Application error type mapping to HTTP status codes and JSON bodies.
//!
//! Every error body is `{"message": ...}`; validation errors add a
//! `details` array. Internal failures are logged and reported with a
//! generic message.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use parley_types::error::{AuthError, ChatError};

pub const MSG_VALIDATION: &str = "Validation error";
pub const MSG_USER_EXISTS: &str = "Username already exists";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const MSG_SESSION_NOT_FOUND: &str = "Chat session not found";
pub const MSG_UNAUTHORIZED: &str = "Unauthorized access";
pub const MSG_INTERNAL: &str = "Internal server error";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Request body failed validation (400).
    Validation(Vec<String>),
    /// Uniqueness violation (400).
    Conflict(String),
    /// Authentication failure (401).
    Unauthorized(String),
    /// Missing or foreign resource (404).
    NotFound(String),
    /// Anything else (500); the detail is logged, never returned.
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [String]>,
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::UsernameTaken => AppError::Conflict(MSG_USER_EXISTS.to_string()),
            AuthError::InvalidCredentials => {
                AppError::Unauthorized(MSG_INVALID_CREDENTIALS.to_string())
            }
            AuthError::InvalidToken(_) => AppError::Unauthorized(MSG_UNAUTHORIZED.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::SessionNotFound => AppError::NotFound(MSG_SESSION_NOT_FOUND.to_string()),
            ChatError::Repository(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match &self {
            AppError::Validation(details) => {
                (StatusCode::BAD_REQUEST, MSG_VALIDATION, Some(details.as_slice()))
            }
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.as_str(), None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.as_str(), None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str(), None),
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL, None)
            }
        };

        (status, Json(ErrorBody { message, details })).into_response()
    }
}
