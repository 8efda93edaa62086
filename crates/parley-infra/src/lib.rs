//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! SQLite storage, Argon2id password hashing, HMAC-signed bearer tokens, and
//! the Gemini completion gateway, plus the runtime configuration object.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod sqlite;
