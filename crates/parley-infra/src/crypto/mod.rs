//! Cryptographic operations for Parley.
//!
//! - `password`: Argon2id password hashing (PHC strings)
//! - `token`: HMAC-SHA256 signed bearer tokens and signing secret generation

pub mod password;
pub mod token;
