//! TokenIssuer trait for signed, time-limited bearer tokens.
//!
//! Tokens are self-contained: verification needs only the signing secret,
//! never a server-side session store.

use parley_types::error::AuthError;
use parley_types::identity::{Claims, User};

/// Issues and verifies bearer tokens carrying `{id, username}`.
pub trait TokenIssuer: Send + Sync {
    /// Sign a fresh token for `user`, valid for the issuer's configured lifetime.
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Fails with `AuthError::InvalidToken` on malformed, mis-signed, or
    /// expired tokens.
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}
