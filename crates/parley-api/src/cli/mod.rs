//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros. Every server setting can come from a flag or
//! from the matching environment variable (a `.env` file is loaded first).

pub mod secret;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;

use parley_infra::config::{
    AppConfig, ConfigError, DEFAULT_CORS_ORIGINS, DEFAULT_HOST, DEFAULT_PORT, parse_origins,
};
use parley_infra::llm::gemini::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use parley_infra::sqlite::pool::DEFAULT_DATABASE_URL;

/// Chat backend with guest sessions, user accounts, and Gemini replies.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as newline-delimited JSON.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve(ServeArgs),

    /// Print a fresh token signing secret for the .env file.
    GenSecret,
}

/// Settings for `parley serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind to.
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Secret used to sign bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// SQLite database URL.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini REST base URL.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub gemini_base_url: String,

    /// Gemini model name.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Gemini request timeout in seconds (1-300).
    #[arg(long, env = "GATEWAY_TIMEOUT_SECS", default_value_t = 30)]
    pub gateway_timeout_secs: u64,

    /// Comma-separated list of allowed browser origins.
    #[arg(long, env = "CORS_ORIGINS", default_value = DEFAULT_CORS_ORIGINS)]
    pub cors_origins: String,
}

impl ServeArgs {
    /// Build the validated runtime configuration.
    pub fn into_config(self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::new(
            SecretString::from(self.jwt_secret.unwrap_or_default()),
            SecretString::from(self.gemini_api_key.unwrap_or_default()),
        );
        config.database_url = self.database_url;
        config.gemini_base_url = self.gemini_base_url;
        config.gemini_model = self.gemini_model;
        config.gateway_timeout = Duration::from_secs(self.gateway_timeout_secs);
        config.host = self.host;
        config.port = self.port;
        config.cors_origins = parse_origins(&self.cors_origins);
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_build_config() {
        let cli = parse(&[
            "parley",
            "-v",
            "serve",
            "--port",
            "8080",
            "--jwt-secret",
            "s3cret",
            "--cors-origins",
            "http://a.test,http://b.test",
            "--gateway-timeout-secs",
            "0",
        ]);
        assert_eq!(cli.verbose, 1);

        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = args.into_config().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.gateway_timeout, Duration::from_secs(1));
    }

    #[test]
    fn gen_secret_parses() {
        assert!(matches!(
            parse(&["parley", "gen-secret"]).command,
            Commands::GenSecret
        ));
    }
}
