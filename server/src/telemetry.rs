//! Logging, optional OpenTelemetry export, and per-request store query counting.

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;

use axum::http::{HeaderValue, Request};
use axum::{body::Body, middleware::Next, response::Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::span::{Attributes, Id};
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::Context, Layer};

use crate::config::Config;

pub const QUERY_COUNT_HEADER: &str = "x-db-query-count";

tokio::task_local! {
    static REQUEST_QUERIES: QueryCounter;
}

/// Initialize the global subscriber.
///
/// Console logging is always on and filtered by `RUST_LOG`. If an OTLP
/// endpoint is configured and accepts a TCP connection, traces and logs are
/// exported to it as well.
pub fn init(config: &Config) -> anyhow::Result<()> {
    let endpoint = config
        .otlp_endpoint
        .as_deref()
        .filter(|endpoint| collector_reachable(endpoint));

    let Some(endpoint) = endpoint else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .with(tracing_subscriber::fmt::layer())
            .with(StoreSpanCounter)
            .try_init()?;

        match &config.otlp_endpoint {
            Some(endpoint) => tracing::info!(
                "OpenTelemetry endpoint {} not reachable, using console logging only",
                endpoint
            ),
            None => {
                tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only")
            }
        }
        return Ok(());
    };

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();
    let tracer = trace_provider.tracer(config.service_name.clone());
    opentelemetry::global::set_tracer_provider(trace_provider);

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(StoreSpanCounter)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .try_init()?;

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        config.service_name
    );
    Ok(())
}

/// Quick TCP check so a missing collector doesn't stall exporting.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

/// Name of the span every [`RecipeStore`](crate::store::RecipeStore) operation opens.
pub const STORE_SPAN: &str = "db.query";

/// Store operations performed while serving one request.
///
/// Clones share the same count. The request's counter is installed by
/// [`count_queries`] and found again through [`QueryCounter::current`].
#[derive(Debug, Clone, Default)]
pub struct QueryCounter(Arc<AtomicU32>);

impl QueryCounter {
    /// Counter for the request being served on this task.
    pub fn current() -> Option<Self> {
        REQUEST_QUERIES.try_with(QueryCounter::clone).ok()
    }

    pub fn total(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// Subscriber layer that records a query whenever a [`STORE_SPAN`] opens.
///
/// Spans opened outside a request (startup, tests without the middleware)
/// are ignored.
pub struct StoreSpanCounter;

impl<S: Subscriber> Layer<S> for StoreSpanCounter {
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        if attrs.metadata().name() != STORE_SPAN {
            return;
        }
        if let Some(counter) = QueryCounter::current() {
            counter.record();
        }
    }
}

/// Run the rest of the stack with a fresh [`QueryCounter`].
///
/// Store calls are synchronous inside the handler future, so their spans open
/// on the task that holds the counter.
pub async fn count_queries(request: Request<Body>, next: Next) -> Response {
    REQUEST_QUERIES
        .scope(QueryCounter::default(), next.run(request))
        .await
}

/// Report the request's query total in [`QUERY_COUNT_HEADER`].
/// Only meaningful underneath [`count_queries`].
pub async fn expose_query_count(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    if let Some(counter) = QueryCounter::current() {
        response
            .headers_mut()
            .insert(QUERY_COUNT_HEADER, HeaderValue::from(counter.total()));
    }
    response
}
