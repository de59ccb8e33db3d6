use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
    trace::TracerProvider,
};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::state::AppState;

/// Fire-and-forget sink for user activity and request timings.
///
/// Implementations must never fail the caller: delivery problems stay inside the sink.
pub trait Telemetry: Send + Sync {
    fn track_event(&self, name: &str);

    fn track_request(&self, method: &Method, path: &str, duration: Duration, status: StatusCode);
}

pub struct OtelTelemetry {
    events: Counter<u64>,
    request_duration: Histogram<f64>,
}

impl OtelTelemetry {
    pub fn new(meter: &Meter) -> Self {
        let events = meter
            .u64_counter("user_service.events")
            .with_description("User activity events")
            .build();
        let request_duration = meter
            .f64_histogram("http.server.request.duration")
            .with_description("Duration of HTTP requests")
            .with_unit("s")
            .build();

        Self {
            events,
            request_duration,
        }
    }
}

impl Telemetry for OtelTelemetry {
    fn track_event(&self, name: &str) {
        tracing::info!(event = name, "telemetry event");
        self.events
            .add(1, &[KeyValue::new("event", name.to_owned())]);
    }

    fn track_request(&self, method: &Method, path: &str, duration: Duration, status: StatusCode) {
        self.request_duration.record(
            duration.as_secs_f64(),
            &[
                KeyValue::new("http.request.method", method.to_string()),
                KeyValue::new("url.path", path.to_owned()),
                KeyValue::new("http.response.status_code", i64::from(status.as_u16())),
            ],
        );
    }
}

/// Used when no instrumentation key is configured.
pub struct NoopTelemetry;

impl Telemetry for NoopTelemetry {
    fn track_event(&self, name: &str) {
        tracing::debug!(event = name, "telemetry disabled, event dropped");
    }

    fn track_request(&self, _: &Method, _: &str, _: Duration, _: StatusCode) {}
}

/// Reports the duration and final status of every request, unmatched paths included.
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(request).await;

    state
        .telemetry
        .track_request(&method, &path, started.elapsed(), response.status());
    response
}

pub fn init_subscriber(tracer: Option<&SdkTracerProvider>, service_name: &str) {
    let otel_layer = tracer.map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_owned()))
    });
    let fmt_layer = tracing_subscriber::fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();
}
