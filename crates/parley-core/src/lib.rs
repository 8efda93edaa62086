//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (repository, hashing, token, and completion
//! gateway traits) that the infrastructure layer implements, plus the services
//! built on them. It depends only on `parley-types` -- never on
//! `parley-infra` or any database/IO crate.

pub mod chat;
pub mod identity;
pub mod llm;
