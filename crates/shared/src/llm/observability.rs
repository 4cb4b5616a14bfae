use std::time::{Duration, Instant};

use super::{LlmCompletion, LlmCompletionRequest, LlmGateway, LlmGatewayError};

#[derive(Debug, Clone, PartialEq)]
pub struct LlmTelemetryEvent {
    pub outcome: &'static str,
    pub latency_ms: u64,
    pub model: Option<String>,
    pub provider_request_id: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
    pub error_type: Option<&'static str>,
}

pub async fn complete_with_telemetry(
    llm_gateway: &dyn LlmGateway,
    request: LlmCompletionRequest,
) -> (Result<LlmCompletion, LlmGatewayError>, LlmTelemetryEvent) {
    let started_at = Instant::now();
    let result = llm_gateway.complete(request).await;
    let telemetry = telemetry_for_result(started_at.elapsed(), &result);
    (result, telemetry)
}

fn telemetry_for_result(
    latency: Duration,
    result: &Result<LlmCompletion, LlmGatewayError>,
) -> LlmTelemetryEvent {
    let latency_ms = duration_to_millis(latency);
    match result {
        Ok(completion) => {
            let usage = completion.usage.as_ref();
            LlmTelemetryEvent {
                outcome: "success",
                latency_ms,
                model: Some(completion.model.clone()),
                provider_request_id: completion.provider_request_id.clone(),
                prompt_tokens: usage.map(|usage| usage.prompt_tokens),
                completion_tokens: usage.map(|usage| usage.completion_tokens),
                total_tokens: usage.map(|usage| usage.total_tokens),
                error_type: None,
            }
        }
        Err(err) => LlmTelemetryEvent {
            outcome: "failure",
            latency_ms,
            model: None,
            provider_request_id: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
            error_type: Some(error_type(err)),
        },
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

fn error_type(error: &LlmGatewayError) -> &'static str {
    match error {
        LlmGatewayError::MissingCredential => "missing_credential",
        LlmGatewayError::Timeout => "timeout",
        LlmGatewayError::Connection => "connection",
        LlmGatewayError::ProviderFailure(_) => "provider_failure",
        LlmGatewayError::InvalidProviderPayload(_) => "invalid_provider_payload",
    }
}
