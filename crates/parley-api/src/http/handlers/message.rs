//! Chat message HTTP handlers.
//!
//! Endpoints:
//! - POST /api/chat/sessions/{id}/messages - Send a message, get the reply
//! - GET  /api/chat/sessions/{id}/messages - List messages in order

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use parley_types::chat::ChatMessage;

use super::parse_session_id;
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::http::extractors::json::ValidatedJson;
use crate::state::AppState;

/// Body of `POST /chat/sessions/{id}/messages`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("\"content\" is not allowed to be empty".into());
        return Err(err);
    }
    Ok(())
}

/// POST /api/chat/sessions/{id}/messages
///
/// Always answers 201 with `[user_message, assistant_message]` once the
/// session is found; a failed completion yields the fallback reply.
pub async fn send_message(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<[ChatMessage; 2]>), AppError> {
    let session_id = parse_session_id(&id)?;
    let pair = state
        .chat_service
        .send_message(owner, session_id, &body.content)
        .await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

/// GET /api/chat/sessions/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let session_id = parse_session_id(&id)?;
    Ok(Json(state.chat_service.list_messages(owner, session_id).await?))
}
