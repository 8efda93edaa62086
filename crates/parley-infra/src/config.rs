//! Runtime configuration for Parley.
//!
//! [`AppConfig`] is built once at startup (the binary fills it from CLI
//! flags with environment fallbacks) and then shared read-only. Secrets are
//! held as [`SecretString`] so they never show up in Debug output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::crypto::token::DEFAULT_TOKEN_TTL_SECS;
use crate::llm::gemini::client::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, clamp_timeout};
use crate::sqlite::pool::DEFAULT_DATABASE_URL;

/// Port the HTTP server listens on by default.
pub const DEFAULT_PORT: u16 = 5000;

/// Interface the HTTP server binds by default.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Browser origin allowed by default (the local web client).
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

/// Problems that prevent the server from starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingSecret(&'static str),

    #[error("invalid CORS origin '{0}'")]
    InvalidOrigin(String),
}

/// Immutable application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub jwt_secret: SecretString,
    pub database_url: String,
    pub gemini_api_key: SecretString,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gateway_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub token_ttl_secs: i64,
}

impl AppConfig {
    /// Configuration with every optional setting at its default.
    pub fn new(jwt_secret: SecretString, gemini_api_key: SecretString) -> Self {
        Self {
            jwt_secret,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            gemini_api_key,
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            gateway_timeout: DEFAULT_TIMEOUT,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: parse_origins(DEFAULT_CORS_ORIGINS),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Check invariants and normalize values.
    ///
    /// The signing secret is mandatory. A missing Gemini key is allowed:
    /// every send then gets the fallback reply, which is logged at startup.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        if self.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingSecret("JWT_SECRET"));
        }

        if self.gemini_api_key.expose_secret().trim().is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; assistant replies will use the fallback text");
        }

        if let Some(bad) = self
            .cors_origins
            .iter()
            .find(|origin| !(origin.starts_with("http://") || origin.starts_with("https://")))
        {
            return Err(ConfigError::InvalidOrigin(bad.clone()));
        }

        self.gateway_timeout = clamp_timeout(self.gateway_timeout);
        Ok(self)
    }

    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| origin.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AppConfig {
        AppConfig::new(SecretString::from(secret), SecretString::from("gemini-key"))
    }

    #[test]
    fn defaults() {
        let config = config("s3cret").validate().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, "sqlite://parley.db?mode=rwc");
        assert_eq!(config.gemini_model, "gemini-1.5-flash");
        assert_eq!(config.gateway_timeout, Duration::from_secs(30));
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.token_ttl_secs, 86_400);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn missing_jwt_secret_is_rejected() {
        let err = config("   ").validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret("JWT_SECRET")));
    }

    #[test]
    fn missing_gemini_key_is_allowed() {
        let config = AppConfig::new(SecretString::from("s3cret"), SecretString::from(""));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn timeout_is_clamped() {
        let mut config = config("s3cret");
        config.gateway_timeout = Duration::from_secs(10_000);
        assert_eq!(
            config.validate().unwrap().gateway_timeout,
            Duration::from_secs(300)
        );
    }

    #[test]
    fn parse_origins_splits_and_trims() {
        assert_eq!(
            parse_origins(" http://localhost:5173/ ,https://chat.example.com,, "),
            vec!["http://localhost:5173", "https://chat.example.com"]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn origin_without_scheme_is_rejected() {
        let mut config = config("s3cret");
        config.cors_origins = vec!["localhost:5173".to_string()];
        assert!(matches!(
            config.validate().unwrap_err(),
            ConfigError::InvalidOrigin(_)
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", config("very-secret-value"));
        assert!(!rendered.contains("very-secret-value"));
        assert!(!rendered.contains("gemini-key"));
    }
}
