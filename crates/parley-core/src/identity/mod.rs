//! User registration, login, bearer tokens, and caller resolution.
//!
//! - `repository`: `UserRepository` port for user persistence
//! - `hash`: `PasswordHasher` port (Argon2id adapter in parley-infra)
//! - `token`: `TokenIssuer` port (HMAC-SHA256 adapter in parley-infra)
//! - `access`: maps an `Authorization` header to an `Owner`
//! - `service`: `IdentityService` tying the ports together

pub mod access;
pub mod hash;
pub mod repository;
pub mod service;
pub mod token;
