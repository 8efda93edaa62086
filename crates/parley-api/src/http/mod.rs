//! HTTP/REST API layer for Parley.
//!
//! Axum-based JSON API under `/api` with optional bearer authentication
//! and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
