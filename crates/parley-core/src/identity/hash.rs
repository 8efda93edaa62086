//! PasswordHasher trait for one-way password storage.
//!
//! Defined in parley-core so the identity service can hash and check
//! passwords without coupling to a specific algorithm. The Argon2id adapter
//! lives in parley-infra.
//!
//! Both operations are CPU-heavy; implementations run them off the async
//! executor threads.

use parley_types::error::AuthError;

/// Abstraction over irreversible password hashing.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string (salt included).
    fn hash_password(
        &self,
        password: &str,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch; `Err` only when the stored hash is
    /// unusable.
    fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, AuthError>> + Send;
}
