use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::any;
use axum::{Router, middleware};
use shared::llm::LlmGateway;

mod cors;
mod errors;
mod generate;
mod observability;


pub const GENERATE_PATH: &str = "/api/generate";

#[derive(Clone)]
pub struct AppState {
    pub llm_gateway: Arc<dyn LlmGateway>,
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(GENERATE_PATH, any(generate::generate))
        .layer(DefaultBodyLimit::max(generate::MAX_BODY_BYTES))
        .layer(middleware::from_fn(cors::cors_middleware))
        .layer(middleware::from_fn(
            observability::request_observability_middleware,
        ))
        .with_state(app_state)
}
