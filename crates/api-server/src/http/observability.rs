use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use shared::llm::LlmTelemetryEvent;
use tracing::{info, warn};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone, Debug)]
pub(super) struct RequestContext {
    pub(super) request_id: String,
}

/// Tags the request with an id (echoed back in `x-request-id`) and logs one
/// metrics line once the response is ready.
pub(super) async fn request_observability_middleware(mut req: Request, next: Next) -> Response {
    let request_id = resolve_request_id(req.headers());
    let metrics = RequestMetrics {
        request_id: request_id.clone(),
        method: req.method().clone(),
        route: req
            .extensions()
            .get::<MatchedPath>()
            .map(|matched| matched.as_str().to_string())
            .unwrap_or_else(|| req.uri().path().to_string()),
        started_at: Instant::now(),
    };
    req.extensions_mut().insert(RequestContext { request_id });

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&metrics.request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    metrics.record(response.status());
    response
}

struct RequestMetrics {
    request_id: String,
    method: Method,
    route: String,
    started_at: Instant,
}

impl RequestMetrics {
    fn record(&self, status: StatusCode) {
        let latency_ms = self.started_at.elapsed().as_millis() as u64;
        let status = status.as_u16();

        if status >= 500 {
            warn!(
                request_id = %self.request_id,
                method = %self.method,
                route = %self.route,
                status,
                latency_ms,
                metric_name = "generate_http_request",
                "generate request failed upstream"
            );
        } else {
            info!(
                request_id = %self.request_id,
                method = %self.method,
                route = %self.route,
                status,
                latency_ms,
                metric_name = "generate_http_request",
                "generate request completed"
            );
        }
    }
}

pub(super) fn log_llm_telemetry(request_id: &str, telemetry: &LlmTelemetryEvent) {
    if telemetry.outcome == "success" {
        info!(
            request_id = %request_id,
            llm_outcome = telemetry.outcome,
            llm_latency_ms = telemetry.latency_ms,
            llm_model = telemetry.model.as_deref().unwrap_or("unknown"),
            llm_provider_request_id = telemetry.provider_request_id.as_deref().unwrap_or(""),
            llm_prompt_tokens = telemetry.prompt_tokens,
            llm_completion_tokens = telemetry.completion_tokens,
            llm_total_tokens = telemetry.total_tokens,
            metric_name = "llm_completion",
            "llm completion metrics"
        );
    } else {
        warn!(
            request_id = %request_id,
            llm_outcome = telemetry.outcome,
            llm_latency_ms = telemetry.latency_ms,
            llm_error_type = telemetry.error_type.unwrap_or("unknown"),
            metric_name = "llm_completion",
            "llm completion failed"
        );
    }
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| is_valid_request_id(value))
        .map(ToString::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn is_valid_request_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':'))
}
