//! Parley REST API entry point.
//!
//! Binary name: `parley`
//!
//! Loads `.env`, parses CLI arguments, sets up tracing, then either prints a
//! signing secret or wires the services and starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;

use cli::{Cli, Commands, ServeArgs};
use parley_observe::{TracingOptions, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut options = TracingOptions::from_verbosity(cli.verbose, cli.quiet);
    options.json = cli.log_json;
    options.otel = cli.otel;
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::GenSecret => {
            cli::secret::gen_secret();
            Ok(())
        }
        Commands::Serve(args) => serve(args).await,
    };

    shutdown_tracing();
    result
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.into_config()?;
    let addr = config.bind_addr();

    let state = AppState::init(config).await?;
    let router = http::router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Parley API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
