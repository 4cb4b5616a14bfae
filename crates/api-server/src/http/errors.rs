use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use shared::models::{ErrorResponse, GenerateResponse};

pub(super) fn bad_request_response(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub(super) fn method_not_allowed_response() -> Response {
    let mut response = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Method Not Allowed".to_string(),
        }),
    )
        .into_response();

    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST"));

    response
}

pub(super) fn payload_too_large_response(limit_bytes: usize) -> Response {
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ErrorResponse {
            error: format!("Body exceeded {limit_bytes} byte limit"),
        }),
    )
        .into_response()
}

pub(super) fn upstream_failure_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(GenerateResponse::failure(message)),
    )
        .into_response()
}
