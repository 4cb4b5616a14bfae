use std::net::SocketAddr;
use std::sync::Arc;

use api_server::http::{AppState, build_router};
use shared::config::{ApiConfig, load_env_file};
use shared::llm::OpenAiGateway;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let env_file = load_env_file();

    init_tracing();

    if let Some(path) = env_file {
        info!("loaded environment from {}", path.display());
    }

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    if config.openai.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; generation requests will fail until it is configured");
    }

    let llm_gateway = match OpenAiGateway::new(config.openai) {
        Ok(gateway) => gateway,
        Err(err) => {
            error!("failed to build llm gateway: {err}");
            std::process::exit(1);
        }
    };
    info!(model = llm_gateway.model(), "chat completion gateway ready");

    let app = build_router(AppState {
        llm_gateway: Arc::new(llm_gateway),
    });

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!("invalid API_BIND_ADDR {}: {err}", config.bind_addr);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "api server listening on {}",
        listener.local_addr().unwrap_or(addr)
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server terminated: {err}");
        std::process::exit(1);
    }
}

/// `LOG_FORMAT=json` switches to one JSON object per event.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "api_server=debug,shared=info,axum=info".to_string());

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.trim().eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
