//! Distributed tracing bootstrap and trace-context bridge.
//!
//! The tracer provider and the W3C TraceContext + Baggage propagator are
//! process-wide state installed once at startup and shut down explicitly at
//! exit. The active [`Context`] is passed explicitly through the request
//! handling chain (routes -> services -> fetch); nothing here reads ambient
//! thread-local context.

use opentelemetry::trace::TraceContextExt;
use opentelemetry::trace::Tracer;
use opentelemetry::{global, Context, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, TracerProvider};
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::config::TelemetrySettings;

/// Instrumentation scope shared by both services
const TRACER_NAME: &str = "cep-weather";

/// Errors raised while bringing up the telemetry pipeline
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to initialize tracing: {0}")]
    TracingInit(String),
}

/// Initialize the tracing subsystem for one service process
///
/// Installs the global tracer provider (OTLP export, batched on the Tokio
/// runtime) and the composite W3C TraceContext + Baggage propagator. Returns
/// the provider so the caller owns shutdown; `None` when tracing is disabled
/// by configuration.
pub fn init_tracing(
    service_name: &str,
    settings: &TelemetrySettings,
) -> Result<Option<TracerProvider>, TelemetryError> {
    // Both services must read and write propagation headers identically,
    // so the propagator is installed even when export is disabled.
    global::set_text_map_propagator(TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ]));

    if !settings.enabled {
        return Ok(None);
    }

    let resource = Resource::new([
        KeyValue::new(
            opentelemetry_semantic_conventions::attribute::SERVICE_NAME,
            service_name.to_string(),
        ),
        KeyValue::new(
            opentelemetry_semantic_conventions::attribute::SERVICE_VERSION,
            env!("CARGO_PKG_VERSION"),
        ),
    ]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&settings.otlp_endpoint)
        .build()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    let sampler = if settings.sample_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if settings.sample_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(settings.sample_ratio)
    };

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    global::set_tracer_provider(provider.clone());

    Ok(Some(provider))
}

/// Flush and shut down the tracing subsystem
pub fn shutdown_tracing() {
    global::shutdown_tracer_provider();
}

/// Extract trace context from carrier headers
pub fn extract_context<T: opentelemetry::propagation::Extractor>(headers: &T) -> Context {
    global::get_text_map_propagator(|propagator| propagator.extract(headers))
}

/// Inject trace context into carrier headers
pub fn inject_context<T: opentelemetry::propagation::Injector>(context: &Context, headers: &mut T) {
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(context, headers);
    });
}

/// Extract the inbound context and start a request span under it
///
/// The span becomes a child of the propagated trace, or a new root when no
/// `traceparent` header is present. The returned context carries the span;
/// callers end it explicitly once the response is composed.
pub fn request_context(
    span_name: &'static str,
    headers: &actix_web::http::header::HeaderMap,
) -> Context {
    let parent = extract_context(&RequestHeaderCarrier(headers));
    let span = global::tracer(TRACER_NAME).start_with_context(span_name, &parent);
    parent.with_span(span)
}

/// Trace-context extractor over an inbound actix-web header map
pub struct RequestHeaderCarrier<'a>(pub &'a actix_web::http::header::HeaderMap);

impl opentelemetry::propagation::Extractor for RequestHeaderCarrier<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Trace-context injector over an outbound reqwest header map
pub struct ClientHeaderInjector<'a>(pub &'a mut reqwest::header::HeaderMap);

impl opentelemetry::propagation::Injector for ClientHeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(val)) = (
            reqwest::header::HeaderName::try_from(key),
            reqwest::header::HeaderValue::try_from(&value),
        ) {
            self.0.insert(name, val);
        }
    }
}
