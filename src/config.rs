//! Configuration parsing for the Fibonacci demo.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Defaults that need no collector to run

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Console log output format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// fib: an interactive Fibonacci calculator traced with OpenTelemetry.
#[derive(Parser, Debug, Clone)]
#[command(name = "fib")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Log filter (trace, debug, info, warn, error, or EnvFilter directives)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log output format on stderr
    #[arg(long, env = "FIB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Log an event each time a span closes
    #[arg(long, env = "FIB_SPAN_EVENTS")]
    pub span_events: bool,

    /// OpenTelemetry collector endpoint for span export (optional)
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otel_endpoint: Option<String>,

    /// Service name reported to the collector
    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "fib")]
    pub service_name: String,

    /// Deployment environment reported to the collector
    #[arg(long, env = "FIB_ENVIRONMENT", default_value = "demo")]
    pub environment: String,

    /// Write every closed span as a JSON line to this file (optional)
    #[arg(long, env = "FIB_TRACE_FILE")]
    pub trace_file: Option<PathBuf>,

    /// Do not print the startup banner
    #[arg(long)]
    pub no_banner: bool,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            log_format: LogFormat::Text,
            span_events: false,
            otel_endpoint: None,
            service_name: "fib".into(),
            environment: "demo".into(),
            trace_file: None,
            no_banner: false,
        }
    }
}
