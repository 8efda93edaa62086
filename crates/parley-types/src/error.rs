use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from registration, login, and bearer token handling.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed")]
    Hashing,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors surfaced by the chat orchestrator.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat session not found")]
    SessionNotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Failures of the external completion provider.
///
/// These never reach an HTTP caller: the chat orchestrator turns them into
/// the fallback assistant reply.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
