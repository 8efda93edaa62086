//! GeminiGateway -- concrete [`CompletionGateway`] for Google Gemini.
//!
//! Sends one `generateContent` request per call with fixed generation
//! settings and returns the first candidate's first text part. No retries.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::gateway::{
    COMPLETION_MAX_OUTPUT_TOKENS, COMPLETION_TEMPERATURE, CompletionGateway,
};
use parley_types::error::GatewayError;

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// Public Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest provider error body kept in a `GatewayError::Status`, in chars.
const MAX_ERROR_BODY_CHARS: usize = 512;

const MIN_TIMEOUT: Duration = Duration::from_secs(1);
const MAX_TIMEOUT: Duration = Duration::from_secs(300);

/// Clamp a configured timeout into the supported 1..=300 second range.
pub fn clamp_timeout(timeout: Duration) -> Duration {
    timeout.clamp(MIN_TIMEOUT, MAX_TIMEOUT)
}

/// Google Gemini completion gateway.
///
/// Does not derive Debug: the struct holds the API key.
pub struct GeminiGateway {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiGateway {
    /// Create a gateway for `model` with the given request timeout
    /// (clamped to 1..=300 seconds).
    pub fn new(
        api_key: SecretString,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(clamp_timeout(timeout))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(e.to_string())
    }
}

fn truncate_body(mut body: String) -> String {
    if let Some((cut, _)) = body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

impl CompletionGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = GenerateContentRequest::single_turn(
            prompt,
            COMPLETION_TEMPERATURE,
            COMPLETION_MAX_OUTPUT_TOKENS,
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GatewayError::MalformedResponse(format!("invalid JSON: {e}")))?;

        parsed
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::MalformedResponse("no candidate text".to_string()))
    }
}
