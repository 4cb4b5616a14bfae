use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, FromRequest, Request, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use shared::llm::{PromptMode, complete_with_telemetry, completion_request_for_prompt};
use shared::models::GenerateResponse;
use tracing::{debug, error};

use super::AppState;
use super::errors::{
    bad_request_response, method_not_allowed_response, payload_too_large_response,
    upstream_failure_response,
};
use super::observability::{RequestContext, log_llm_telemetry};

pub(super) const MAX_BODY_BYTES: usize = 1024 * 1024;

const BODY_READ_FAILED: &str = "Failed to read request body";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct GenerateInput {
    pub(super) prompt: String,
    pub(super) mode: Option<PromptMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum InputError {
    InvalidJson,
    MissingPrompt,
}

impl InputError {
    const fn message(self) -> &'static str {
        match self {
            Self::InvalidJson => "Invalid JSON body",
            Self::MissingPrompt => "Prompt is required",
        }
    }
}

pub(super) async fn generate(
    State(state): State<AppState>,
    Extension(request_context): Extension<RequestContext>,
    req: Request,
) -> Response {
    // The method is checked before the body is touched.
    if req.method() != Method::POST {
        return method_not_allowed_response();
    }

    // Only the length limit is a 413; a body that fails mid-stream is a 400.
    let body = match Bytes::from_request(req, &state).await {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return payload_too_large_response(MAX_BODY_BYTES);
        }
        Err(rejection) => {
            debug!(
                request_id = %request_context.request_id,
                "failed to read request body: {rejection}"
            );
            return bad_request_response(BODY_READ_FAILED);
        }
    };

    let input = match parse_generate_input(&body) {
        Ok(input) => input,
        Err(err) => return bad_request_response(err.message()),
    };
    debug!(
        request_id = %request_context.request_id,
        mode = input.mode.map(PromptMode::as_str).unwrap_or("none"),
        prompt_chars = input.prompt.chars().count(),
        "generation request accepted"
    );

    let request = completion_request_for_prompt(&input.prompt, input.mode);
    let (result, telemetry) = complete_with_telemetry(state.llm_gateway.as_ref(), request).await;
    log_llm_telemetry(&request_context.request_id, &telemetry);

    match result {
        Ok(completion) => (
            StatusCode::OK,
            Json(GenerateResponse::ok(completion.content)),
        )
            .into_response(),
        Err(err) => {
            error!(
                request_id = %request_context.request_id,
                "generation failed: {err}"
            );
            upstream_failure_response(&err.to_string())
        }
    }
}

/// Reads `{ prompt, mode }` leniently: a non-object body or a non-string
/// prompt counts as a missing prompt, and any mode that is not a known tag
/// means no mode.
pub(super) fn parse_generate_input(body: &[u8]) -> Result<GenerateInput, InputError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(InputError::MissingPrompt);
    }

    let value: Value = serde_json::from_slice(body).map_err(|_| InputError::InvalidJson)?;
    let prompt = value
        .get("prompt")
        .and_then(Value::as_str)
        .filter(|prompt| !prompt.is_empty())
        .ok_or(InputError::MissingPrompt)?;
    let mode = value
        .get("mode")
        .and_then(Value::as_str)
        .and_then(PromptMode::from_tag);

    Ok(GenerateInput {
        prompt: prompt.to_string(),
        mode,
    })
}
