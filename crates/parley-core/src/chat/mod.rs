//! Chat sessions, messages, and the orchestrator that ties them to the
//! completion gateway.
//!
//! - `repository`: `ChatRepository` port for session and message persistence
//! - `service`: `ChatService`, the owner-scoped orchestrator
//! - `title`: automatic session title derivation

pub mod repository;
pub mod service;
pub mod title;
