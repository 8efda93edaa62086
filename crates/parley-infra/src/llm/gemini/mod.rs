//! Google Gemini completion gateway.
//!
//! This module provides the [`GeminiGateway`] which implements the
//! [`CompletionGateway`](parley_core::llm::gateway::CompletionGateway) trait
//! for the `generateContent` endpoint.

pub mod client;
pub mod types;

pub use client::GeminiGateway;
