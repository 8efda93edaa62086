//! CompletionGateway trait definition.
//!
//! A gateway sends one user utterance to an external text-generation
//! provider and returns its plain-text reply. Calls are single-turn and
//! stateless: no conversation history is forwarded.

use parley_types::error::GatewayError;

/// Fixed sampling temperature for every completion.
pub const COMPLETION_TEMPERATURE: f64 = 0.7;

/// Cap on generated tokens per completion.
pub const COMPLETION_MAX_OUTPUT_TOKENS: u32 = 2048;

/// Trait for text-generation backends.
///
/// Implementations must not retry; the caller decides what a failure means.
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait CompletionGateway: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Generate a reply for a single prompt.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, GatewayError>> + Send;
}
