//! Logging, tracing, and metrics setup for the villa API.
//!
//! Logs are written by a `tracing-subscriber` fmt layer filtered through
//! `RUST_LOG` (default `info`). Spans leave the process over OTLP only when
//! `OTEL_EXPORTER_OTLP_ENDPOINT` is set. Everything recorded with the `metrics`
//! macros (`villa_changes_total`, `villas_total`, ...) is rendered in Prometheus
//! text format on a separate `/metrics` listener.
use anyhow::Context;
use axum::Router;
use axum::http::HeaderMap;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::future::Future;
use std::sync::{Once, OnceLock};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "info";
const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";
const INSTANCE_ID_ENV: &str = "VILLA_SERVICE_INSTANCE_ID";

static SUBSCRIBER: Once = Once::new();
static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the log subscriber and the Prometheus recorder.
///
/// Later calls keep the first subscriber and return the same recorder handle.
///
/// # Errors
/// - Another global metrics recorder was installed first.
pub fn init_observability(service_name: &str) -> anyhow::Result<PrometheusHandle> {
    SUBSCRIBER.call_once(|| install_subscriber(service_name));
    metrics_recorder()
}

fn install_subscriber(service_name: &str) {
    global::set_text_map_propagator(TraceContextPropagator::new());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let otel = otlp_provider(service_name).map(|provider| {
        let tracer = provider.tracer(service_name.to_string());
        global::set_tracer_provider(provider);
        tracing_opentelemetry::layer().with_tracer(tracer)
    });
    // Test binaries may already own the global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel)
        .try_init();
}

fn otlp_provider(service_name: &str) -> Option<SdkTracerProvider> {
    std::env::var_os(OTLP_ENDPOINT_ENV)?;
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .ok()?;
    let resource = Resource::builder_empty()
        .with_attributes(resource_attributes(service_name))
        .build();
    Some(
        SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build(),
    )
}

fn resource_attributes(service_name: &str) -> Vec<KeyValue> {
    let instance = std::env::var(INSTANCE_ID_ENV)
        .or_else(|_| std::env::var("HOSTNAME"))
        .ok();
    let environment = std::env::var("DEPLOYMENT_ENVIRONMENT").ok();
    std::iter::once(KeyValue::new("service.name", service_name.to_string()))
        .chain(instance.map(|id| KeyValue::new("service.instance.id", id)))
        .chain(environment.map(|env| KeyValue::new("deployment.environment", env)))
        .collect()
}

/// Parent context carried by W3C `traceparent`/`tracestate` request headers.
pub fn trace_context_from_headers(headers: &HeaderMap) -> opentelemetry::Context {
    TraceContextPropagator::new().extract(&RequestHeaders(headers))
}

struct RequestHeaders<'a>(&'a HeaderMap);

impl Extractor for RequestHeaders<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.to_str().ok()
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

fn metrics_recorder() -> anyhow::Result<PrometheusHandle> {
    if let Some(handle) = RECORDER.get() {
        return Ok(handle.clone());
    }
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("install prometheus recorder")?;
    Ok(RECORDER.get_or_init(|| handle).clone())
}

/// Router exposing the recorder at `GET /metrics`.
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

/// Serve [`metrics_router`] on `listener` until `shutdown` resolves.
pub async fn serve_metrics<F>(
    listener: TcpListener,
    handle: PrometheusHandle,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, metrics_router(handle).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}
