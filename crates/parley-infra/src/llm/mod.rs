//! Completion gateway implementations.
//!
//! Contains the concrete [`CompletionGateway`](parley_core::llm::gateway::CompletionGateway)
//! used in production: Google Gemini over its REST API.

pub mod gemini;
