//! fib: an interactive Fibonacci calculator traced with OpenTelemetry.
//!
//! # Usage
//!
//! ```bash
//! fib --otel-endpoint http://localhost:4317 --log-level info
//! ```
//!
//! Environment variables can also be used:
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: Collector endpoint for span export
//! - `FIB_TRACE_FILE`: File receiving one JSON line per closed span
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::io;
use std::thread;

use anyhow::Context;
use fib_telemetry::app::{App, RunError};
use fib_telemetry::config::Config;
use fib_telemetry::observability::tracing::{init_tracing, TracingGuard};
use tokio::sync::oneshot;

/// Print startup banner with version and telemetry configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    let endpoint = config.otel_endpoint.as_deref().unwrap_or("disabled");
    let trace_file = config
        .trace_file
        .as_ref()
        .map_or_else(|| "disabled".to_string(), |p| p.display().to_string());
    eprintln!(
        r#"
  fib v{} - Fibonacci with OpenTelemetry

  Telemetry:
    Service:     {} ({})
    OTLP:        {}
    Trace File:  {}
    Log Level:   {}

  Enter one number per line. Ctrl+D to finish, Ctrl+C to quit.
"#,
        version,
        config.service_name,
        config.environment,
        endpoint,
        trace_file,
        config.log_level
    );
}

/// Wait for SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() -> io::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            res = ctrl_c => {
                res?;
                tracing::info!("Received SIGINT (Ctrl+C), shutting down");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await?;
        tracing::info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

/// Flush telemetry off the async workers.
async fn shutdown_tracing(guard: TracingGuard) {
    if let Err(e) = tokio::task::spawn_blocking(move || guard.shutdown()).await {
        eprintln!("telemetry shutdown failed: {e}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Initialize tracing/logging
    let guard = init_tracing(&config).context("failed to initialize telemetry")?;

    if !config.no_banner {
        print_banner(&config);
    }

    // The loop blocks on stdin, so it gets its own thread. A plain thread
    // does not hold up process exit when a signal arrives mid-read.
    let (done_tx, done_rx) = oneshot::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut app = App::new(stdin.lock(), io::stdout());
        let _ = done_tx.send(app.run());
    });

    let outcome: Result<u64, RunError> = tokio::select! {
        res = done_rx => res.context("request loop exited unexpectedly")?,
        res = shutdown_signal() => {
            res.context("failed to listen for shutdown signals")?;
            println!("\ngoodbye");
            Ok(0)
        }
    };

    shutdown_tracing(guard).await;

    let requests = outcome.context("request loop failed")?;
    tracing::debug!(requests, "fib exiting");
    Ok(())
}
