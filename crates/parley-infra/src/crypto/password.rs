//! Argon2id implementation of the `PasswordHasher` port.
//!
//! Hashes are self-describing PHC strings (`$argon2id$v=19$m=...`) carrying
//! their own random salt and parameters, so verification needs nothing but
//! the stored string.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordVerifier, Version};

use parley_core::identity::hash::PasswordHasher;
use parley_types::error::AuthError;

/// Argon2id password hasher with OWASP recommended parameters:
/// 19 MiB memory, 2 iterations, 1 degree of parallelism.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        // argon2's defaults are m=19456 KiB, t=2, p=1.
        Self::with_params(Params::default())
    }

    /// Use custom cost parameters (tests use cheap ones).
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        run_blocking(move || hash_blocking(&argon2, &password)).await
    }

    async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        run_blocking(move || verify_blocking(&argon2, &password, &password_hash)).await
    }
}

/// Run Argon2 work on tokio's blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "Password hashing task failed");
        AuthError::Hashing
    })?
}

fn hash_blocking(argon2: &Argon2<'static>, password: &str) -> Result<String, AuthError> {
    use argon2::PasswordHasher as _;

    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AuthError::Hashing
        })
}

fn verify_blocking(
    argon2: &Argon2<'static>,
    password: &str,
    password_hash: &str,
) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is not a valid PHC string");
        AuthError::Hashing
    })?;

    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => {
            tracing::error!(error = %e, "Password verification failed");
            Err(AuthError::Hashing)
        }
    }
}
