//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/chat/sessions      - Create a session for the caller
//! - GET    /api/chat/sessions      - List the caller's sessions
//! - DELETE /api/chat/sessions/{id} - Delete a session and its messages

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use parley_types::chat::ChatSession;

use super::parse_session_id;
use crate::http::error::AppError;
use crate::http::extractors::caller::Caller;
use crate::state::AppState;

/// Optional body of `POST /chat/sessions`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionEnvelope {
    pub session: ChatSession,
}

/// POST /api/chat/sessions
///
/// The body may be absent entirely; an empty body means "default title".
pub async fn create_session(
    State(state): State<AppState>,
    Caller(owner): Caller,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionEnvelope>), AppError> {
    let request: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::Validation(vec![e.to_string()]))?
    };

    let session = state
        .chat_service
        .create_session(owner, request.title)
        .await?;
    Ok((StatusCode::CREATED, Json(SessionEnvelope { session })))
}

/// GET /api/chat/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Caller(owner): Caller,
) -> Result<Json<Vec<ChatSession>>, AppError> {
    Ok(Json(state.chat_service.list_sessions(owner).await?))
}

/// DELETE /api/chat/sessions/{id}
pub async fn delete_session(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let session_id = parse_session_id(&id)?;
    state.chat_service.delete_session(owner, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
