//! Caller extractor: the access gate in front of every chat route.
//!
//! Resolves the `Authorization` header into an [`Owner`]. Requests without
//! a bearer credential proceed as guests; a bearer credential that does not
//! verify is rejected with 401 before the handler runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use parley_types::identity::Owner;

use crate::http::error::AppError;
use crate::state::AppState;

/// The owner scope of the current request.
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub Owner);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A header that is not valid UTF-8 cannot carry a bearer token.
        let authorization = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let owner = state
            .identity_service
            .resolve_owner(authorization)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::from(e)
            })?;

        Ok(Caller(owner))
    }
}
