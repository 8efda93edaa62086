//! Shared domain types for Parley.
//!
//! Users, bearer token claims, session ownership, chat sessions and messages,
//! and the error enums shared across layers.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod error;
pub mod identity;
