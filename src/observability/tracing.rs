//! OpenTelemetry tracing setup.
//!
//! Configures structured logging with:
//! - Console logging on stderr (text or JSON)
//! - Optional span-per-line JSON trace file
//! - Optional OTLP exporter for distributed tracing

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Instrumentation scope name for spans produced by this crate.
pub const TRACER_NAME: &str = "fib";

/// Error type for telemetry initialization.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {source}")]
    Filter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to open trace file {path}: {source}")]
    TraceFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry::trace::TraceError),

    #[error("Tracing already initialized: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Handle to the installed tracer provider.
///
/// Call [`TracingGuard::shutdown`] before exit so buffered spans are flushed.
#[derive(Debug, Default)]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl TracingGuard {
    /// Whether spans are being exported over OTLP.
    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush pending spans and shut the exporter down.
    ///
    /// Blocks until the exporter has drained, so call it off the async
    /// worker threads.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Failed to shut down tracer provider");
            }
        }
    }
}

/// Initialize tracing from the given configuration.
///
/// This sets up:
/// - Console logging on stderr in the configured format
/// - Environment-based filter (via `--log-level` / RUST_LOG)
/// - A JSON span log when `trace_file` is set
/// - OTLP span export when `otel_endpoint` is set
///
/// Must be called from within a Tokio runtime when an OTLP endpoint is
/// configured, since the batch exporter runs on it.
///
/// # Errors
///
/// Returns an error if the filter is invalid, the trace file cannot be
/// created, the exporter cannot be built, or tracing is already initialized.
pub fn init_tracing(config: &Config) -> Result<TracingGuard, TelemetryError> {
    let filter = EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::Filter {
        filter: config.log_level.clone(),
        source,
    })?;

    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let text_layer = (config.log_format == LogFormat::Text).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_span_events(span_events.clone())
    });

    let json_layer = (config.log_format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_events(span_events.clone())
    });

    let file_layer = match &config.trace_file {
        Some(path) => {
            let file = open_trace_file(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
        }
        None => None,
    };

    let provider = match &config.otel_endpoint {
        Some(endpoint) => Some(build_tracer_provider(config, endpoint)?),
        None => None,
    };

    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(TRACER_NAME)));

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(file_layer)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    if let Some(provider) = &provider {
        opentelemetry::global::set_tracer_provider(provider.clone());
    }

    tracing::info!(
        service = %config.service_name,
        otlp = config.otel_endpoint.is_some(),
        "Tracing initialized"
    );

    Ok(TracingGuard { provider })
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}

fn open_trace_file(path: &Path) -> Result<File, TelemetryError> {
    File::create(path).map_err(|source| TelemetryError::TraceFile {
        path: path.display().to_string(),
        source,
    })
}

fn resource(config: &Config) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ])
}

fn build_tracer_provider(
    config: &Config,
    endpoint: &str,
) -> Result<TracerProvider, TelemetryError> {
    use opentelemetry_otlp::{Protocol, WithExportConfig};

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint)
        .with_protocol(Protocol::Grpc);

    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(opentelemetry_sdk::trace::Config::default().with_resource(resource(config)))
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    tracing::debug!(endpoint, "OTLP trace exporter configured");
    Ok(provider)
}
