//! Observability setup for Parley: tracing subscriber with optional JSON
//! output and OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
