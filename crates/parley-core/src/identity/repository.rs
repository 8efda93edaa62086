//! UserRepository trait definition.
//!
//! Provides user creation, lookup by username, and login bookkeeping.

use chrono::{DateTime, Utc};
use parley_types::error::RepositoryError;
use parley_types::identity::{User, UserId};

/// Repository trait for user persistence.
///
/// Implementations live in parley-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Create a new user.
    ///
    /// Returns `RepositoryError::Conflict` when the username is already taken.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Find a user by exact username.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Record a successful login.
    fn update_last_login(
        &self,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
