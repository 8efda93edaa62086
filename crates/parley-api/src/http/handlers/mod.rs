//! HTTP request handlers for the REST API.

pub mod auth;
pub mod message;
pub mod session;

use uuid::Uuid;

use crate::http::error::{AppError, MSG_SESSION_NOT_FOUND};

/// Parse a session id from a path segment.
///
/// An id that is not a UUID cannot name an existing session, so it is
/// reported as not found rather than as a bad request.
pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse::<Uuid>()
        .map_err(|_| AppError::NotFound(MSG_SESSION_NOT_FOUND.to_string()))
}
