//! Identity service: registration, login, and token verification.
//!
//! IdentityService coordinates the UserRepository, a PasswordHasher, and a
//! TokenIssuer. Passwords are only ever stored as hashes; every successful
//! register or login returns the user together with a fresh bearer token.

use chrono::{SubsecRound, Utc};
use parley_types::error::{AuthError, RepositoryError};
use parley_types::identity::{Claims, Owner, User, UserId};
use serde::Serialize;
use tracing::{debug, info};

use super::access::resolve_owner;
use super::hash::PasswordHasher;
use super::repository::UserRepository;
use super::token::TokenIssuer;

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthGrant {
    pub user: User,
    pub token: String,
}

/// Registers and authenticates users and verifies their tokens.
pub struct IdentityService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> IdentityService<U, H, T> {
    /// Create a new identity service.
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user and sign them in.
    ///
    /// Fails with `AuthError::UsernameTaken` if the username exists, whether
    /// detected up front or by the store's uniqueness constraint.
    pub async fn register(&self, username: &str, password: &str) -> Result<AuthGrant, AuthError> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }

        let now = Utc::now().trunc_subsecs(6);
        let user = User {
            id: UserId::new(),
            username: username.to_string(),
            password_hash: self.hasher.hash_password(password).await?,
            created_at: now,
            last_login: now,
        };

        let user = match self.users.create_user(&user).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict(_)) => return Err(AuthError::UsernameTaken),
            Err(e) => return Err(e.into()),
        };

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "User registered");
        Ok(AuthGrant { user, token })
    }

    /// Check credentials, record the login, and issue a token.
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthGrant, AuthError> {
        let Some(mut user) = self.users.find_by_username(username).await? else {
            debug!("Login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify_password(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        // Keep last_login monotonic even if the wall clock steps backwards.
        user.last_login = Utc::now().trunc_subsecs(6).max(user.last_login);
        self.users.update_last_login(&user.id, user.last_login).await?;

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "User logged in");
        Ok(AuthGrant { user, token })
    }

    /// Verify a bearer token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens.verify(token)
    }

    /// Resolve the owner scope from a raw `Authorization` header value.
    pub fn resolve_owner(&self, authorization: Option<&str>) -> Result<Owner, AuthError> {
        resolve_owner(authorization, &self.tokens)
    }
}
